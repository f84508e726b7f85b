//! In-memory scene implementation.
//!
//! Holds a complete object graph in process memory behind one mutex, which
//! is the single serialization boundary the [`SceneProvider`] contract
//! requires. Used as the demo scene for the standalone binary and as the
//! test double for the protocol code.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::SceneError;
use crate::messages::{ObjectRef, ObjectSnapshot};
use crate::scene::{PropertyValue, RigidBody, SceneObject, SceneProvider, Vec3};

struct World {
    objects: Vec<SceneObject>,
    initial: Vec<SceneObject>,
    time_scale: f64,
    frame_rate: f64,
    cursor_visible: bool,
    running: bool,
}

impl World {
    fn find(&self, name: &str) -> Result<&SceneObject, SceneError> {
        self.objects
            .iter()
            .find(|obj| obj.name == name)
            .ok_or_else(|| SceneError::ObjectNotFound(name.to_string()))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut SceneObject, SceneError> {
        self.objects
            .iter_mut()
            .find(|obj| obj.name == name)
            .ok_or_else(|| SceneError::ObjectNotFound(name.to_string()))
    }
}

/// An in-memory [`SceneProvider`].
pub struct InMemoryScene {
    world: Mutex<World>,
}

impl InMemoryScene {
    /// Create a scene from an initial object set. `restart` returns to
    /// exactly this state.
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self {
            world: Mutex::new(World {
                initial: objects.clone(),
                objects,
                time_scale: 1.0,
                frame_rate: 60.0,
                cursor_visible: true,
                running: true,
            }),
        }
    }

    /// The canonical demo scene used by the standalone binary and tests.
    pub fn demo() -> Self {
        let mut cube = SceneObject::new("Cube");
        cube.position = Vec3::new(0.0, 0.0, 1.0);
        cube.physics = Some(RigidBody::with_mass(1.0));
        cube.properties
            .insert("health".to_string(), PropertyValue::Int(100));
        cube.properties
            .insert("speed".to_string(), PropertyValue::Float(2.5));
        cube.properties
            .insert("invincible".to_string(), PropertyValue::Bool(false));
        cube.properties
            .insert("tag".to_string(), PropertyValue::Text("player".to_string()));
        cube.properties.insert(
            "spawn_point".to_string(),
            PropertyValue::Vector(Vec3::new(0.0, 0.0, 1.0)),
        );
        cube.materials = Some(vec!["CubeMaterial".to_string()]);

        let mut sphere = SceneObject::new("Sphere");
        sphere.position = Vec3::new(3.0, -2.0, 0.5);
        sphere.physics = Some(RigidBody {
            mass: 0.5,
            linear_velocity: Vec3::new(0.0, 0.0, -9.81),
            angular_velocity: Vec3::new(0.1, 0.0, 0.0),
        });
        sphere.materials = Some(vec!["SphereMaterial".to_string(), "Glass".to_string()]);

        let mut lamp = SceneObject::new("Lamp");
        lamp.position = Vec3::new(-4.0, 1.0, 6.0);
        lamp.properties
            .insert("energy".to_string(), PropertyValue::Float(10.0));

        let camera = SceneObject::new("Camera");

        Self::new(vec![cube, sphere, lamp, camera])
    }

    /// Whether the simulation is still running (`end` flips this off).
    pub async fn is_running(&self) -> bool {
        self.world.lock().await.running
    }

    /// Whether the engine mouse cursor is currently shown.
    pub async fn cursor_visible(&self) -> bool {
        self.world.lock().await.cursor_visible
    }
}

#[async_trait]
impl SceneProvider for InMemoryScene {
    async fn list_objects(&self) -> Vec<ObjectRef> {
        let world = self.world.lock().await;
        world
            .objects
            .iter()
            .map(|obj| ObjectRef {
                name: obj.name.clone(),
            })
            .collect()
    }

    async fn snapshot(&self, name: &str) -> Result<ObjectSnapshot, SceneError> {
        let world = self.world.lock().await;
        Ok(world.find(name)?.snapshot())
    }

    async fn update_property<'a>(
        &self,
        name: &str,
        property: &str,
        value: &Value,
        axis: Option<&'a str>,
    ) -> Result<(), SceneError> {
        // One lock across the whole read-modify-write keeps axis updates
        // atomic with respect to other property writers.
        let mut world = self.world.lock().await;
        world.find_mut(name)?.update_property(property, value, axis)
    }

    async fn toggle_visibility(&self, name: &str) -> Result<bool, SceneError> {
        let mut world = self.world.lock().await;
        let obj = world.find_mut(name)?;
        obj.visible = !obj.visible;
        Ok(obj.visible)
    }

    async fn average_frame_rate(&self) -> f64 {
        self.world.lock().await.frame_rate
    }

    async fn time_scale(&self) -> f64 {
        self.world.lock().await.time_scale
    }

    async fn set_time_scale(&self, scale: f64) {
        self.world.lock().await.time_scale = scale;
    }

    async fn show_mouse_cursor(&self, visible: bool) {
        self.world.lock().await.cursor_visible = visible;
    }

    async fn restart(&self) {
        let mut world = self.world.lock().await;
        world.objects = world.initial.clone();
        world.time_scale = 1.0;
        world.running = true;
    }

    async fn end(&self) {
        self.world.lock().await.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_objects_preserves_scene_order() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        let objects = scene.list_objects().await;

        // then (expected result):
        let names: Vec<&str> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Cube", "Sphere", "Lamp", "Camera"]);
    }

    #[tokio::test]
    async fn test_snapshot_of_missing_object_errors_with_name() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        let err = scene.snapshot("Ghost").await.unwrap_err();

        // then (expected result):
        assert!(err.to_string().contains("Ghost"));
    }

    #[tokio::test]
    async fn test_axis_update_is_visible_in_next_snapshot() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        scene
            .update_property("Sphere", "position", &json!(5.0), Some("x"))
            .await
            .unwrap();
        let snapshot = scene.snapshot("Sphere").await.unwrap();

        // then (expected result): x changed, y and z survived
        assert_eq!(snapshot.basic.position.x, 5.0);
        assert_eq!(snapshot.basic.position.y, -2.0);
        assert_eq!(snapshot.basic.position.z, 0.5);
    }

    #[tokio::test]
    async fn test_toggle_visibility_round_trips() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        let hidden = scene.toggle_visibility("Cube").await.unwrap();
        let shown = scene.toggle_visibility("Cube").await.unwrap();

        // then (expected result):
        assert!(!hidden);
        assert!(shown);
    }

    #[tokio::test]
    async fn test_toggle_visibility_of_missing_object_errors() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        let err = scene.toggle_visibility("Ghost").await.unwrap_err();

        // then (expected result):
        assert!(matches!(err, SceneError::ObjectNotFound(_)));
        assert!(err.to_string().contains("Ghost"));
    }

    #[tokio::test]
    async fn test_restart_restores_initial_objects_and_time_scale() {
        // given (precondition):
        let scene = InMemoryScene::demo();
        scene
            .update_property("Cube", "position", &json!(99.0), Some("z"))
            .await
            .unwrap();
        scene.set_time_scale(4.0).await;

        // when (operation):
        scene.restart().await;

        // then (expected result):
        let snapshot = scene.snapshot("Cube").await.unwrap();
        assert_eq!(snapshot.basic.position.z, 1.0);
        assert_eq!(scene.time_scale().await, 1.0);
        assert!(scene.is_running().await);
    }

    #[tokio::test]
    async fn test_end_marks_simulation_stopped() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        scene.end().await;

        // then (expected result):
        assert!(!scene.is_running().await);
    }

    #[tokio::test]
    async fn test_snapshot_physics_sentinel_for_non_physics_objects() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        let lamp = scene.snapshot("Lamp").await.unwrap();
        let cube = scene.snapshot("Cube").await.unwrap();

        // then (expected result):
        assert_eq!(
            serde_json::to_value(&lamp.physics).unwrap(),
            json!({"status": "Not applicable"})
        );
        assert!(matches!(
            cube.physics,
            crate::messages::PhysicsState::Rigid { .. }
        ));
    }

    #[tokio::test]
    async fn test_snapshot_materials_sentinel_for_objects_without_mesh() {
        // given (precondition):
        let scene = InMemoryScene::demo();

        // when (operation):
        let camera = scene.snapshot("Camera").await.unwrap();
        let sphere = scene.snapshot("Sphere").await.unwrap();

        // then (expected result):
        assert_eq!(camera.materials, vec!["Not applicable".to_string()]);
        assert_eq!(
            sphere.materials,
            vec!["SphereMaterial".to_string(), "Glass".to_string()]
        );
    }
}
