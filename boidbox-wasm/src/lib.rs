use boidbox_core::{Agent, Boundaries, Vector3D};
use boidbox_shared::{FlockHost, ResponsiveViewport, SettingsFile, SimulationSettings};
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&format_args!($($t)*).to_string().into()))
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Flattens one vector per agent into `[x0, y0, z0, x1, ...]`.
fn flatten(agents: &[Agent], pick: impl Fn(&Agent) -> Vector3D) -> Vec<f32> {
    agents.iter().flat_map(|agent| pick(agent).to_array()).collect()
}

/// Flock simulation driven by a JavaScript render loop. The renderer reads
/// the typed-array getters after each `step` and never writes back.
#[wasm_bindgen]
pub struct BoidSimulation {
    host: FlockHost,
}

#[wasm_bindgen]
impl BoidSimulation {
    /// `settings_json` is a settings file as JSON (or nothing for the
    /// defaults); `width`/`height` is the canvas the flock is fitted to.
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: Option<String>,
        width: f32,
        height: f32,
        seed: Option<u32>,
    ) -> Result<BoidSimulation, JsValue> {
        let settings = match settings_json {
            Some(json) => SettingsFile::from_json(&json).map_err(js_error)?,
            None => SettingsFile::default(),
        };
        let viewport = ResponsiveViewport::new(width, height);
        let host = FlockHost::new(settings, Some(viewport), seed.map(u64::from)).map_err(js_error)?;

        console_log!(
            "Initialized boid simulation with {} boids in {:?}",
            host.flock().len(),
            host.config().boundaries
        );
        Ok(BoidSimulation { host })
    }

    /// Advances the flock by `delta` seconds. Returns how many agents were
    /// being pushed back from a wall.
    pub fn step(&mut self, delta: f32) -> usize {
        self.host.tick(delta.max(0.0)).contained
    }

    pub fn rebuild(&mut self) -> Result<(), JsValue> {
        self.host.rebuild().map_err(js_error)
    }

    /// Refits the boundaries to the canvas. Returns whether the flock was
    /// rebuilt.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<bool, JsValue> {
        let change = self
            .host
            .resize(ResponsiveViewport::new(width, height))
            .map_err(js_error)?;
        Ok(change.rebuild)
    }

    /// Replaces every simulation setting from JSON. Returns whether the
    /// flock was rebuilt.
    pub fn apply_settings(&mut self, settings_json: &str) -> Result<bool, JsValue> {
        let settings = SimulationSettings::from_json(settings_json).map_err(js_error)?;
        self.apply(settings)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.host.settings()).map_err(js_error)
    }

    fn apply(&mut self, settings: SimulationSettings) -> Result<bool, JsValue> {
        let change = self.host.apply_settings(settings).map_err(js_error)?;
        if change.rebuild {
            console_log!("Flock rebuilt with {} boids", self.host.flock().len());
        }
        Ok(change.rebuild)
    }

    fn tweak(&mut self, edit: impl FnOnce(&mut SimulationSettings)) -> Result<bool, JsValue> {
        let mut settings = self.host.settings().clone();
        edit(&mut settings);
        self.apply(settings)
    }

    pub fn set_population(&mut self, population: usize) -> Result<bool, JsValue> {
        self.tweak(|s| s.population = population)
    }

    pub fn set_scale_range(&mut self, min: f32, max: f32) -> Result<bool, JsValue> {
        self.tweak(|s| {
            s.min_scale = min;
            s.max_scale = max;
        })
    }

    pub fn set_min_speed(&mut self, speed: f32) -> Result<bool, JsValue> {
        self.tweak(|s| s.min_speed = speed)
    }

    pub fn set_max_speed(&mut self, speed: f32) -> Result<bool, JsValue> {
        self.tweak(|s| s.max_speed = speed)
    }

    pub fn set_max_steering(&mut self, steering: f32) -> Result<bool, JsValue> {
        self.tweak(|s| s.max_steering = steering)
    }

    pub fn set_wander_radius(&mut self, radius: f32) -> Result<bool, JsValue> {
        self.tweak(|s| s.wander_radius = radius)
    }

    pub fn set_wander_strength(&mut self, strength: f32) -> Result<bool, JsValue> {
        self.tweak(|s| s.wander_strength = strength)
    }

    pub fn set_wander_circle(&mut self, visible: bool) -> Result<bool, JsValue> {
        self.tweak(|s| s.wander_circle = visible)
    }

    pub fn set_boundaries(&mut self, x: f32, y: f32, z: f32) -> Result<bool, JsValue> {
        self.tweak(|s| s.boundaries = Boundaries::new(x, y, z))
    }

    pub fn set_three_d(&mut self, three_d: bool) -> Result<bool, JsValue> {
        self.tweak(|s| s.three_d = three_d)
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<bool, JsValue> {
        self.tweak(|s| s.theme = theme.to_string())
    }

    pub fn agent_count(&self) -> usize {
        self.host.flock().len()
    }

    /// Fitted box size as `[x, y, z]`, for drawing the debug volume.
    pub fn boundaries(&self) -> Vec<f32> {
        let b = self.host.config().boundaries;
        vec![b.x, b.y, b.z]
    }

    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&flatten(self.host.flock().agents(), |a| a.position)[..])
    }

    pub fn velocities(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&flatten(self.host.flock().agents(), |a| a.velocity)[..])
    }

    pub fn scales(&self) -> js_sys::Float32Array {
        let scales: Vec<f32> = self.host.flock().iter().map(|a| a.scale).collect();
        js_sys::Float32Array::from(&scales[..])
    }

    pub fn model_kinds(&self) -> js_sys::Uint16Array {
        let kinds: Vec<u16> = self.host.flock().iter().map(|a| a.model_kind.0).collect();
        js_sys::Uint16Array::from(&kinds[..])
    }

    /// Asset names of the active theme, indexed by model kind.
    pub fn model_names(&self) -> Result<Vec<String>, JsValue> {
        Ok(self.host.theme().map_err(js_error)?.models.clone())
    }

    /// Whole flock as a JSON frame snapshot.
    pub fn frame_json(&self) -> Result<String, JsValue> {
        let frame = self.host.frame().map_err(js_error)?;
        frame.to_json().map_err(js_error)
    }
}
