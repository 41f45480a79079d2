//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use scene_component::{ComponentRef, EntityId};
use scene_components::{
    Bloom, Camera, Effect, Follow, Light, LightType, LookAt, MeshRenderer, PostProcessStack,
    Script, Tonemap,
};
use scene_graph::{Scene, SceneConfig};
use scene_math::{Quat, Vec3};
use scene_serde::{LoadedScene, SceneDocument};
use tracing::{info, warn};
use uuid::Uuid;

fn is_snapshot(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "msgpack")
}

fn read_document(path: &Path) -> Result<SceneDocument> {
    let doc = if is_snapshot(path) {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        SceneDocument::from_snapshot(&bytes)?
    } else {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        SceneDocument::from_json(&text)?
    };
    info!(file = %path.display(), entities = doc.entities.len(), "document read");
    Ok(doc)
}

fn write_document(doc: &SceneDocument, path: &Path) -> Result<()> {
    let written = if is_snapshot(path) {
        fs::write(path, doc.to_snapshot()?)
    } else {
        fs::write(path, doc.to_json()?)
    };
    written.with_context(|| format!("writing {}", path.display()))?;
    info!(file = %path.display(), "document written");
    Ok(())
}

fn load_scene(path: &Path) -> Result<Scene> {
    let LoadedScene { scene, skipped } = read_document(path)?
        .instantiate(&scene_components::registry(), &scene_components::serializer())?;
    for member in &skipped {
        warn!(%member, "skipped while loading");
    }
    Ok(scene)
}

// -- inspect --

pub fn inspect(path: &Path) -> Result<()> {
    let scene = load_scene(path)?;
    println!("scene '{}' ({} entities)", scene.name(), scene.entity_count());
    for root in scene.roots() {
        print_tree(&scene, root, 0)?;
    }
    Ok(())
}

fn print_tree(scene: &Scene, id: EntityId, depth: usize) -> Result<()> {
    let entity = scene.entity(id).context("entity vanished during traversal")?;
    let (position, _, _) = scene.world_trs(id)?;
    let components: Vec<&str> = entity.components().map(|s| s.type_name()).collect();
    println!(
        "{:indent$}{}{} @ ({:.2}, {:.2}, {:.2}) [{}]",
        "",
        entity.name(),
        if entity.is_active() { "" } else { " (inactive)" },
        position.x,
        position.y,
        position.z,
        components.join(", "),
        indent = depth * 2,
    );
    for child in entity.children() {
        print_tree(scene, *child, depth + 1)?;
    }
    Ok(())
}

// -- clone --

pub fn clone(path: &Path, out: &Path) -> Result<()> {
    let source = load_scene(path)?;
    let copy = source.duplicate(&scene_components::registry())?;
    let doc = SceneDocument::capture(&copy, &scene_components::serializer());
    write_document(&doc, out)
}

// -- roundtrip --

pub fn roundtrip(path: &Path) -> Result<()> {
    let original = read_document(path)?;
    let serializer = scene_components::serializer();
    let LoadedScene { scene, skipped } =
        original.instantiate(&scene_components::registry(), &serializer)?;
    let resaved = SceneDocument::capture(&scene, &serializer);

    let changed: Vec<&str> = original
        .entities
        .iter()
        .zip(&resaved.entities)
        .filter(|(a, b)| a != b)
        .map(|(a, _)| a.name.as_str())
        .collect();
    for name in &changed {
        warn!(entity = name, "entity changed across round trip");
    }

    let snapshot = SceneDocument::from_snapshot(&resaved.to_snapshot()?)?;
    println!(
        "{} entities, {} skipped members, {} changed, snapshot {}",
        resaved.entities.len(),
        skipped.len(),
        changed.len(),
        if snapshot == resaved { "ok" } else { "MISMATCH" }
    );
    ensure!(snapshot == resaved, "snapshot encoding is not lossless");
    ensure!(
        original.entities.len() == resaved.entities.len(),
        "entity count changed from {} to {}",
        original.entities.len(),
        resaved.entities.len()
    );
    Ok(())
}

// -- demo --

/// A small scene touching every component type.
fn demo_scene() -> Result<Scene> {
    let mut scene = Scene::new(SceneConfig::new("Demo"));

    let sun = scene.create_entity("Sun")?;
    scene.set_local_trs(sun, Vec3::new(0.0, 20.0, 0.0), Quat::from_rotation_x(-0.9), Vec3::ONE)?;
    scene.add_component(sun, Light::directional(Vec3::new(1.0, 0.95, 0.8), 3.0))?;

    let player = scene.create_entity("Player")?;
    scene.set_local_trs(player, Vec3::new(2.0, 0.0, -3.0), Quat::IDENTITY, Vec3::ONE)?;
    scene.add_component(player, MeshRenderer::new(Uuid::new_v4()))?;
    scene.add_component(player, Script::new("scripts/player.lua", "PlayerController"))?;

    let torch = scene.create_entity("Torch")?;
    scene.set_parent(torch, Some(player), false)?;
    scene.set_local_trs(torch, Vec3::new(0.4, 1.2, 0.0), Quat::IDENTITY, Vec3::splat(0.5))?;
    scene.add_component(
        torch,
        Light {
            color: Vec3::new(1.0, 0.5, 0.1),
            intensity: 2.5,
            light_type: LightType::Point,
            range: 6.0,
            ..Light::default()
        },
    )?;

    let camera = scene.create_entity("Main Camera")?;
    let player_ref = scene
        .entity_ref(player)
        .context("player missing from demo scene")?;
    let torch_ref = scene.entity_ref(torch).context("torch missing from demo scene")?;
    scene.add_component(
        camera,
        Camera {
            primary: true,
            ..Camera::default()
        },
    )?;
    scene.add_component(camera, Follow::new(player_ref, Vec3::new(0.0, 3.0, 8.0)))?;
    scene.add_component(camera, LookAt::new(ComponentRef::of::<Light>(torch_ref)))?;
    scene.add_component(
        camera,
        PostProcessStack::default()
            .with(Effect::Bloom(Bloom::default()))
            .with(Effect::Tonemap(Tonemap::default())),
    )?;
    Ok(scene)
}

pub fn demo(out: &Path) -> Result<()> {
    let scene = demo_scene()?;
    let doc = SceneDocument::capture(&scene, &scene_components::serializer());
    write_document(&doc, out)
}
