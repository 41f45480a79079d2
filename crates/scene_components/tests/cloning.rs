//! Play-mode style duplication across the whole stack.

use scene_component::{ComponentRef, short_type_name};
use scene_components::{
    Effect, Follow, Light, LookAt, PostProcessStack, Script, Tonemap,
};
use scene_graph::{ComponentHost, Entity, Scene, SceneCloner, SceneError};
use scene_math::{Quat, Vec3};

struct ScriptRuntime {
    next_handle: u64,
}

impl ComponentHost for ScriptRuntime {
    fn attach(&mut self, entity: &mut Entity, type_name: &str) -> Result<bool, SceneError> {
        if short_type_name(type_name) != "Script" {
            return Ok(false);
        }
        let mut script = Script::default();
        script.bind(self.next_handle);
        self.next_handle += 1;
        entity.add_component(script)?;
        Ok(true)
    }
}

fn level() -> Scene {
    let mut scene = Scene::default();
    let player = scene.create_entity("Player").unwrap();
    let camera = scene.create_entity("Camera").unwrap();
    let torch = scene.create_entity("Torch").unwrap();
    scene.set_parent(torch, Some(player), false).unwrap();
    scene
        .set_local_trs(player, Vec3::new(5.0, 0.0, -2.0), Quat::from_rotation_y(1.2), Vec3::splat(1.5))
        .unwrap();
    scene
        .set_local_trs(torch, Vec3::new(0.3, 1.0, 0.0), Quat::IDENTITY, Vec3::ONE)
        .unwrap();

    scene.add_component(torch, Light::default()).unwrap();
    let player_ref = scene.entity_ref(player).unwrap();
    let torch_ref = scene.entity_ref(torch).unwrap();
    scene
        .add_component(camera, Follow::new(player_ref, Vec3::new(0.0, 2.0, 6.0)))
        .unwrap();
    scene
        .add_component(camera, LookAt::new(ComponentRef::of::<Light>(torch_ref)))
        .unwrap();
    scene
        .add_component(
            camera,
            PostProcessStack::default().with(Effect::Tonemap(Tonemap::default())),
        )
        .unwrap();
    scene
        .add_component(player, Script::new("player.lua", "PlayerController"))
        .unwrap();
    scene
}

#[test]
fn test_clone_matches_structure_with_new_identities() {
    let source = level();
    let clone = source.duplicate(&scene_components::registry()).unwrap();

    assert_eq!(clone.entity_count(), source.entity_count());
    for (a, b) in source.iter().zip(clone.iter()) {
        assert_eq!(a.name(), b.name());
        assert_ne!(a.guid(), b.guid());
        assert_eq!(a.transform(), b.transform());
        let parent_name = |scene: &Scene, e: &Entity| {
            e.parent().and_then(|p| scene.entity(p)).map(|p| p.name().to_string())
        };
        assert_eq!(parent_name(&source, a), parent_name(&clone, b));
        assert_eq!(a.children().len(), b.children().len());
    }
    for guid in source.iter().map(Entity::guid) {
        assert_eq!(clone.find_by_guid(&guid), None);
    }
}

#[test]
fn test_clone_references_point_into_clone() {
    let source = level();
    let clone = source.duplicate(&scene_components::registry()).unwrap();
    let camera = clone.entity(clone.find_by_name("Camera").unwrap()).unwrap();
    let player = clone.entity_ref(clone.find_by_name("Player").unwrap());
    let torch = clone.entity_ref(clone.find_by_name("Torch").unwrap());

    assert_eq!(camera.component::<Follow>().unwrap().target, player);
    assert_eq!(
        camera.component::<LookAt>().unwrap().target.map(|t| t.entity),
        torch
    );
    assert_eq!(camera.component::<PostProcessStack>().unwrap().effects.len(), 1);
}

#[test]
fn test_mutating_clone_leaves_source_alone() {
    let mut source = level();
    let mut clone = source.duplicate(&scene_components::registry()).unwrap();
    let src_torch = source.find_by_name("Torch").unwrap();
    let cl_torch = clone.find_by_name("Torch").unwrap();

    clone
        .entity_mut(cl_torch)
        .unwrap()
        .component_mut::<Light>()
        .unwrap()
        .intensity = 9.0;
    assert_eq!(
        source.entity(src_torch).unwrap().component::<Light>().unwrap().intensity,
        1.0
    );

    source
        .entity_mut(src_torch)
        .unwrap()
        .component_mut::<Light>()
        .unwrap()
        .range = 50.0;
    assert_eq!(
        clone.entity(cl_torch).unwrap().component::<Light>().unwrap().range,
        10.0
    );

    clone.destroy_entity(cl_torch).unwrap();
    assert!(source.contains(src_torch));
    let camera = clone.entity(clone.find_by_name("Camera").unwrap()).unwrap();
    assert!(camera.component::<LookAt>().unwrap().aim(&clone, camera.id()).is_none());
}

#[test]
fn test_scripts_are_created_by_the_runtime() {
    let source = level();
    let registry = scene_components::registry();
    let mut runtime = ScriptRuntime { next_handle: 100 };
    let mut cloner = SceneCloner::new(&registry).with_host(&mut runtime);
    let clone = cloner.clone_scene(&source).unwrap();
    assert!(cloner.skipped().is_empty());

    let player = clone.entity(clone.find_by_name("Player").unwrap()).unwrap();
    let script = player.component::<Script>().unwrap();
    assert_eq!(script.instance(), Some(100));
    assert_eq!(script.source, "player.lua");
    assert_eq!(script.class_name, "PlayerController");
}
