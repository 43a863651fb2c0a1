//! Browser binding
//!
//! JS owns the canvas and the animation loop; it forwards pointer/keyboard
//! events and calls `frame` once per `requestAnimationFrame`. The draw list
//! and HUD come back as JSON.

use wasm_bindgen::prelude::*;

use crate::games::GameId;
use crate::harness::{Key, RuntimeHarness};
use crate::persistence::{LocalStorageStore, MemoryStore};
use crate::settings::HarnessSettings;
use crate::{ArcadeError, ArcadeSim};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Pulse Arcade loaded");
}

fn to_js(e: ArcadeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

enum Host {
    Local(RuntimeHarness<ArcadeSim, LocalStorageStore>),
    /// No LocalStorage available; scores live for the page only
    Memory(RuntimeHarness<ArcadeSim, MemoryStore>),
}

macro_rules! with_harness {
    ($host:expr, $h:ident => $body:expr) => {
        match $host {
            Host::Local($h) => $body,
            Host::Memory($h) => $body,
        }
    };
}

#[wasm_bindgen]
pub struct WebArcade {
    host: Host,
    last_time: f64,
}

#[wasm_bindgen]
impl WebArcade {
    #[wasm_bindgen(constructor)]
    pub fn new(game_id: &str, width: f32, height: f32) -> Result<WebArcade, JsValue> {
        let game: GameId = game_id.parse().map_err(to_js)?;
        let seed = js_sys::Date::now() as u64;

        let host = match LocalStorageStore::open() {
            Some(mut store) => {
                let settings = HarnessSettings::load_and_repair(&mut store);
                Host::Local(
                    RuntimeHarness::for_game(game, store, settings, seed, width, height)
                        .map_err(to_js)?,
                )
            }
            None => {
                log::warn!("LocalStorage unavailable, progress will not be saved");
                Host::Memory(
                    RuntimeHarness::for_game(
                        game,
                        MemoryStore::new(),
                        HarnessSettings::default(),
                        seed,
                        width,
                        height,
                    )
                    .map_err(to_js)?,
                )
            }
        };

        Ok(WebArcade {
            host,
            last_time: 0.0,
        })
    }

    /// Advance to the `requestAnimationFrame` timestamp (ms)
    pub fn frame(&mut self, time: f64) -> Result<(), JsValue> {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            0.0
        };
        self.last_time = time;
        with_harness!(&mut self.host, h => h.frame(dt).map(|_| ()).map_err(to_js))
    }

    pub fn press(&mut self, x: f32, y: f32) {
        with_harness!(&mut self.host, h => h.press(x, y))
    }

    pub fn release(&mut self, x: f32, y: f32) {
        with_harness!(&mut self.host, h => h.release(x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        with_harness!(&mut self.host, h => h.pointer_move(x, y))
    }

    /// `KeyboardEvent.code`
    pub fn key_down(&mut self, code: &str) {
        let key = Key::from_code(code);
        with_harness!(&mut self.host, h => h.key_down(key))
    }

    pub fn key_up(&mut self, code: &str) {
        let key = Key::from_code(code);
        with_harness!(&mut self.host, h => h.key_up(key))
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        with_harness!(&mut self.host, h => h.resize(width, height))
    }

    pub fn request_reset(&mut self) -> u64 {
        with_harness!(&mut self.host, h => h.request_reset())
    }

    pub fn hud_json(&self) -> String {
        with_harness!(&self.host, h => serde_json::to_string(&h.hud()).unwrap_or_default())
    }

    pub fn draw_list_json(&self) -> String {
        with_harness!(&self.host, h => serde_json::to_string(h.frame_list()).unwrap_or_default())
    }
}

/// Game ids for a menu, as a JSON array of `{ id, title }`
#[wasm_bindgen]
pub fn game_list_json() -> String {
    let games: Vec<serde_json::Value> = GameId::ALL
        .iter()
        .map(|g| serde_json::json!({ "id": g.as_str(), "title": g.spec().title }))
        .collect();
    serde_json::Value::Array(games).to_string()
}
