//! Spell Typer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use spell_typer::spell::NoScripts;
    use spell_typer::{Game, GameConfig};

    /// Frame delta used before the first timestamp arrives
    const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

    /// Host state around a game session
    struct Host {
        game: Game,
        last_time: f64,
        restart_pending: Rc<Cell<bool>>,
    }

    impl Host {
        /// One frame: spawn timer, simulation, then the HUD query
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(1.0)
            } else {
                FIRST_FRAME_DT
            };
            self.last_time = time;

            self.game.elapse(dt);
            if let Err(e) = self.game.update() {
                log::error!("Frame failed: {e}");
                alert(&e.to_string());
            }
            self.update_spell_box();

            if self.restart_pending.replace(false) {
                let seed = js_sys::Date::now() as u64;
                self.game.restart(seed);
            }
        }

        fn update_spell_box(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("spell-box") {
                el.set_text_content(Some(&self.game.typed_text()));
            }
            if let Some(el) = document.get_element_by_id("spell-suggestions") {
                el.set_text_content(Some(&self.game.suggestions().join(" ")));
            }
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spell Typer starting...");

        let seed = js_sys::Date::now() as u64;
        let mut game = match Game::new(GameConfig::default(), seed, &mut NoScripts) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Could not start game: {e}");
                alert(&e.to_string());
                return;
            }
        };

        // Restart on the frame after any game over
        let restart_pending = Rc::new(Cell::new(false));
        {
            let restart_pending = restart_pending.clone();
            game.on_game_over(move |outcome| {
                log::info!("Game over: {outcome:?}");
                restart_pending.set(true);
            });
        }

        let host = Rc::new(RefCell::new(Host {
            game,
            last_time: 0.0,
            restart_pending,
        }));

        // Keyboard
        {
            let host = host.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                host.borrow_mut().game.handle_key(event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        request_animation_frame(host);
        log::info!("Spell Typer running!");
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        host.borrow_mut().frame(time);
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: types a few spells and logs what happens
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spell_typer::config::ScriptedSpellConfig;
    use spell_typer::error::ScriptError;
    use spell_typer::sim::World;
    use spell_typer::spell::ScriptHandle;
    use spell_typer::{Game, GameConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Spell Typer (native) starting...");
    log::info!("Native mode runs a scripted demo - run with `trunk serve` for the web version");

    let mut config = GameConfig::default();
    config.spells.scripted.push(ScriptedSpellConfig {
        name: "home".into(),
        durability: 1,
        script: "recenter".into(),
    });

    // The native host knows one script: snap the player back to the origin
    let mut evaluator = |spell: &ScriptedSpellConfig| -> Result<ScriptHandle, ScriptError> {
        match spell.script.as_str() {
            "recenter" => Ok(ScriptHandle::new(|_, world: &mut World| {
                world.player.pos = glam::Vec2::ZERO;
                Ok(false)
            })),
            _ => Err(ScriptError::Unbound {
                spell: spell.name.clone(),
            }),
        }
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = match Game::new(config, seed, &mut evaluator) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Could not start game: {e}");
            std::process::exit(1);
        }
    };
    game.on_game_over(|outcome| log::info!("Observer saw {outcome:?}"));

    const DT: f32 = 1.0 / 60.0;
    let script = ["r", "i", "Enter", "", "d", "o", "w", "n", " ", "l", "Enter"];
    for frame in 0..240 {
        if let Some(key) = script.get(frame) {
            game.handle_key(*key);
        }
        game.elapse(DT);
        match game.update() {
            Ok(report) if report.lost || report.won => {
                log::info!("Frame {frame}: lost={} won={}", report.lost, report.won);
                game.restart(seed.wrapping_add(frame as u64));
            }
            Ok(_) => {}
            Err(e) => log::warn!("Frame {frame} failed: {e}"),
        }
    }

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize snapshot: {e}"),
    }
}
