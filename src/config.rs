use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub flight: FlightConfigData,
    pub camera: CameraConfigData,
    pub time: TimeConfigData,
    pub scene: SceneConfigData,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flight: FlightConfigData::default(),
            camera: CameraConfigData::default(),
            time: TimeConfigData::default(),
            scene: SceneConfigData::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: &str) -> Self {
        Self::load(path).unwrap_or_else(|_| {
            let config = Self::default();
            // Try to save the default config
            let _ = config.save(path);
            config
        })
    }
}

/// Flight model parameters (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightConfigData {
    /// Gain per held movement key, units per second squared
    pub acceleration: f32,
    /// Velocity bleed-off on released axes, units per second squared
    pub deceleration: f32,
    /// Per-axis velocity cap, units per second
    pub max_speed: f32,
    /// Clearance kept between the camera and any collidable surface
    pub min_distance: f32,
    /// Multiplier on look rotation rates
    pub look_sensitivity: f32,
}

impl Default for FlightConfigData {
    fn default() -> Self {
        Self {
            acceleration: 40.0,
            deceleration: 60.0,
            max_speed: 25.0,
            min_distance: 1.5,
            look_sensitivity: 1.0,
        }
    }
}

/// Drone camera start pose (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfigData {
    #[serde(with = "vec3_serde")]
    pub position: Vec3,

    #[serde(with = "vec3_serde")]
    pub look_at: Vec3,

    /// Field of view in degrees
    pub fov: f32,
}

impl Default for CameraConfigData {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 100.0),
            look_at: Vec3::new(0.0, 50.0, 0.0),
            fov: 75.0,
        }
    }
}

/// Day/night schedule parameters (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfigData {
    /// Hour the day window opens
    pub day_start: u64,
    /// Hour the day window closes
    pub day_end: u64,
    /// Wall-clock poll spacing in milliseconds
    pub update_interval_ms: u64,
}

impl Default for TimeConfigData {
    fn default() -> Self {
        Self {
            day_start: 6,
            day_end: 18,
            update_interval_ms: 1000,
        }
    }
}

/// Scene content configuration (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfigData {
    /// Base layout model streamed in at startup
    pub base_model_path: String,
}

impl Default for SceneConfigData {
    fn default() -> Self {
        Self {
            base_model_path: "assets/models/layout.obj".to_string(),
        }
    }
}

/// Custom serialization for Vec3
mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}
