use std::time::{Duration, Instant};

/// Statistics for the lifetime of the process. Nothing is written to disk.
pub struct SessionStats {
    pub run_started: Option<Instant>,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            run_started: None,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    /// Refresh the run clock; it stands still between games
    pub fn update(&mut self) {
        if let Some(started) = self.run_started {
            self.elapsed_time = started.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.run_started = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.run_started = None;
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Score with `,` between thousands, e.g. `12,300`
pub fn format_score(score: u32) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
