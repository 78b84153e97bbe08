//! Banana Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use banana_catch::consts::*;
    use banana_catch::format_time;
    use banana_catch::net::{ApiClient, Profile, ScoreReport, ScoreSubmission};
    use banana_catch::render::Renderer;
    use banana_catch::sim::{
        ChallengeStatus, GamePhase, GameState, ImageRetry, TickInput, tick,
    };
    use banana_catch::{PersonalBest, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<Renderer>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Phase seen last frame, for edge-triggered effects
        last_phase: GamePhase,
        api: ApiClient,
        /// Score service's verdict on this session, once it arrives
        report: Option<ScoreReport>,
        /// Signed-in profile, once it arrives
        profile: Option<Profile>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, api: ApiClient) -> Self {
            Self {
                state: GameState::with_tuning(seed, tuning),
                renderer: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                last_phase: GamePhase::Playing,
                api,
                report: None,
                profile: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.answer = None;
                self.input.skip_challenge = false;
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(ref renderer) = self.renderer {
                renderer.draw(&self.state);
            }
        }

        /// Reset for "play again"; the session bump makes any in-flight
        /// response from the old session a no-op
        fn restart(&mut self, seed: u64) {
            self.state.restart(seed);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.last_phase = GamePhase::Playing;
            self.report = None;
        }

        /// Best score to show on the game-over card: server verdict first,
        /// then profile, then the local record
        fn best_score(&self) -> u64 {
            if let Some(report) = &self.report {
                return report.current_high_score.max(self.state.score);
            }
            let profile_best = self.profile.as_ref().map_or(0, |p| p.highest_score);
            let local_best = PersonalBest::load().map_or(0, |b| b.score);
            profile_best.max(local_best)
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "hud-score", &self.state.score.to_string());
            set_text(&document, "hud-level", &self.state.level.to_string());
            set_text(
                &document,
                "hud-bananas",
                &self.state.bananas_collected.to_string(),
            );
            set_text(&document, "hud-time", &format_time(self.state.elapsed_seconds()));

            let lives = self.state.lives as usize;
            let max = self.state.tuning.start_lives as usize;
            let hearts = format!(
                "{}{}",
                "\u{2764}\u{FE0F}".repeat(lives),
                "\u{1F5A4}".repeat(max.saturating_sub(lives))
            );
            set_text(&document, "hud-lives", &hearts);

            set_hidden(
                &document,
                "pause-menu",
                self.state.phase != GamePhase::Paused,
            );

            self.update_challenge_overlay(&document);
            self.update_game_over_overlay(&document);
        }

        fn update_challenge_overlay(&self, document: &Document) {
            let in_challenge = self.state.phase == GamePhase::Challenge;
            set_hidden(document, "challenge-overlay", !in_challenge);
            if !in_challenge {
                return;
            }
            let Some(challenge) = self.state.challenge.as_ref() else {
                return;
            };

            let loading = matches!(challenge.status, ChallengeStatus::Loading);
            let failed = matches!(challenge.status, ChallengeStatus::LoadFailed { .. });
            set_hidden(document, "challenge-loading", !loading);
            set_hidden(document, "challenge-body", loading || failed);
            set_hidden(document, "challenge-failed", !failed);
            set_hidden(document, "challenge-image-box", challenge.text_only);
            set_hidden(document, "challenge-text-prompt", !challenge.text_only);
            set_text(
                document,
                "challenge-timer",
                &format!("{}s", challenge.seconds_left()),
            );
        }

        fn update_game_over_overlay(&self, document: &Document) {
            let over = self.state.phase == GamePhase::GameOver;
            set_hidden(document, "game-over", !over);
            if !over {
                return;
            }

            let new_best = self.report.as_ref().is_some_and(|r| r.is_new_high_score);
            set_hidden(document, "new-high-score", !new_best);
            set_text(document, "final-score", &self.state.score.to_string());
            set_text(
                document,
                "final-bananas",
                &self.state.bananas_collected.to_string(),
            );
            set_text(
                document,
                "final-missed",
                &self.state.missed_bananas.to_string(),
            );
            set_text(document, "final-level", &self.state.level.to_string());
            set_text(
                document,
                "final-time",
                &format_time(self.state.elapsed_seconds()),
            );
            set_text(document, "final-best", &self.best_score().to_string());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Banana Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let api = ApiClient::from_window();
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, api)));

        log::info!("Session initialized with seed: {}", seed);

        match Renderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Renderer init failed: {e:?}"),
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_challenge_controls(game.clone());
        setup_auto_pause(game.clone());
        fetch_profile(game.clone());

        request_animation_frame(game);

        log::info!("Banana Catch running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Held movement keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => {
                        event.prevent_default();
                        g.input.left = true;
                    }
                    "ArrowRight" | "d" | "D" => {
                        event.prevent_default();
                        g.input.right = true;
                    }
                    "p" | "P" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["pause-btn", "resume-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().input.pause = true;
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Session restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("leaderboard-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                refresh_leaderboard(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_challenge_controls(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Submit: parse locally, reject non-numeric input without a tick
        let submit = {
            let game = game.clone();
            move || {
                let document = web_sys::window().unwrap().document().unwrap();
                let Some(input_el) = document
                    .get_element_by_id("challenge-answer")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                match input_el.value().trim().parse::<i64>() {
                    Ok(answer) => {
                        set_text(&document, "challenge-error", "");
                        game.borrow_mut().input.answer = Some(answer);
                        input_el.set_value("");
                    }
                    Err(_) => {
                        set_text(&document, "challenge-error", "Enter a whole number");
                    }
                }
            }
        };

        if let Some(btn) = document.get_element_by_id("challenge-submit") {
            let submit = submit.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                submit();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(input_el) = document.get_element_by_id("challenge-answer") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    submit();
                }
            });
            let _ = input_el
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("challenge-skip") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.skip_challenge = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Image failures: bounded retry, then text-only prompt
        if let Some(img) = document.get_element_by_id("challenge-img") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let Some(challenge) = g.state.challenge.as_mut() else {
                    return;
                };
                match challenge.asset_failed() {
                    ImageRetry::Retry(attempt) => {
                        log::warn!("Challenge image failed, retry {attempt}");
                        if let ChallengeStatus::Ready { prompt, .. } = &challenge.status {
                            set_challenge_image(prompt);
                        }
                    }
                    ImageRetry::TextOnly => {
                        log::warn!("Challenge image retries exhausted, text-only prompt");
                    }
                }
            });
            let _ = img.add_event_listener_with_callback("error", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn set_challenge_image(url: &str) {
        if let Some(img) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("challenge-img"))
        {
            let _ = img.set_attribute("src", url);
        }
    }

    /// Fetch the puzzle question for the challenge that just opened. The
    /// completion is dropped if the session restarted or the challenge
    /// already resolved while the request was in flight.
    fn start_challenge_fetch(game: Rc<RefCell<Game>>) {
        let (session, api) = {
            let g = game.borrow();
            (g.state.session, g.api.clone())
        };

        spawn_local(async move {
            let result = api.fetch_question().await;
            let mut g = game.borrow_mut();
            if g.state.session != session {
                log::warn!("Dropping question for a superseded session");
                return;
            }
            let Some(challenge) = g.state.challenge.as_mut() else {
                return;
            };
            match result {
                Ok(question) => {
                    log::info!("Challenge question ready");
                    set_challenge_image(&question.prompt);
                    challenge.question_loaded(question.prompt, question.solution);
                }
                Err(e) => {
                    log::warn!("Question fetch failed: {e}");
                    challenge.load_failed();
                }
            }
        });
    }

    /// Submit the final stats, exactly once per session; the one-shot guard
    /// lives in the state so re-entering this path is harmless
    fn submit_score(game: Rc<RefCell<Game>>) {
        let Some(stats) = game.borrow_mut().state.take_session_stats() else {
            return;
        };

        // Local record first, so "your best" works even offline
        PersonalBest::record(stats.score, stats.level, js_sys::Date::now());

        let (session, api) = {
            let g = game.borrow();
            (g.state.session, g.api.clone())
        };
        let submission = ScoreSubmission::from(stats);

        spawn_local(async move {
            match api.submit_score(&submission).await {
                Ok(report) => {
                    let mut g = game.borrow_mut();
                    if g.state.session != session {
                        log::warn!("Dropping score report for a superseded session");
                        return;
                    }
                    if report.is_new_high_score {
                        log::info!("New high score: {}", report.current_high_score);
                    }
                    g.report = Some(report);
                }
                Err(e) => {
                    log::warn!("Score submission failed, keeping local record: {e}");
                }
            }
        });
    }

    fn fetch_profile(game: Rc<RefCell<Game>>) {
        let api = game.borrow().api.clone();
        spawn_local(async move {
            match api.profile().await {
                Ok(profile) => {
                    log::info!("Signed in as {}", profile.username);
                    game.borrow_mut().profile = Some(profile);
                }
                Err(e) => log::info!("No profile available: {e}"),
            }
        });
    }

    fn refresh_leaderboard(game: Rc<RefCell<Game>>) {
        let api = game.borrow().api.clone();
        spawn_local(async move {
            let page = match api.leaderboard(10, 1).await {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Leaderboard fetch failed: {e}");
                    return;
                }
            };
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            list.set_text_content(None);
            for entry in &page.scores {
                if let Ok(li) = document.create_element("li") {
                    li.set_text_content(Some(&format!("{} — {}", entry.username, entry.score)));
                    let _ = list.append_child(&li);
                }
            }
            set_hidden(&document, "leaderboard-panel", false);
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let (entered_challenge, entered_game_over) = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);

            // Edge-triggered effects fire once per transition, never on
            // re-render
            let phase = g.state.phase;
            let entered_challenge =
                phase == GamePhase::Challenge && g.last_phase != GamePhase::Challenge;
            let entered_game_over =
                phase == GamePhase::GameOver && g.last_phase != GamePhase::GameOver;
            g.last_phase = phase;

            g.render();
            g.update_hud();

            (entered_challenge, entered_game_over)
        };

        if entered_challenge {
            start_challenge_fetch(game.clone());
        }
        if entered_game_over {
            submit_score(game.clone());
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Banana Catch (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run a short scripted session to exercise the simulation natively
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use banana_catch::consts::{SIM_DT, TICK_HZ};
    use banana_catch::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(20260826);
    let max_ticks = 120 * TICK_HZ;

    for i in 0..max_ticks {
        // Sweep the basket back and forth
        let sweep = (i / (2 * TICK_HZ)) % 2 == 0;
        let input = TickInput {
            left: !sweep,
            right: sweep,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        // The demo has no puzzle provider; skip any challenge that opens
        if state.phase == GamePhase::Challenge {
            let skip = TickInput {
                skip_challenge: true,
                ..Default::default()
            };
            tick(&mut state, &skip, SIM_DT);
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let stats = state.take_session_stats();
    println!(
        "demo finished: phase={:?} score={} bananas={} missed={} level={} elapsed={}s",
        state.phase,
        state.score,
        state.bananas_collected,
        state.missed_bananas,
        state.level,
        state.elapsed_seconds()
    );
    if let Some(stats) = stats {
        println!("final stats for submission: {stats:?}");
    }
}
