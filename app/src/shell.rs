//! # Shell
//!
//! Line-driven stand-in for the mobile pages: login, dashboard, sample list
//! and the "add sample" scanner modal. While the scanner is open every line is
//! treated as a decoded QR payload.
use std::{
    future::Future,
    io::{Write, stdout},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use client::{
    ApiError, AuthSession, BottleSession, Config, HttpApi, Level, NoticeLog, SampleFeed,
    SessionError, State,
    error::FALLBACK_MESSAGE,
    models::{LoginMode, ResultCode, SampleSummary},
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin, stdin};
use tracing::info;

use crate::camera::ConsoleCamera;

type Input = Lines<BufReader<Stdin>>;

const HELP: &str = "\
commands:
  login <username> <password>   sign in
  logout                        sign out
  profile | dashboard           account and counters
  samples | more                list received samples, next page
  register <no_sampel>          register a sample
  scan                          open the scanner (lines are then decoded text)
  :close | :camera              while scanning: close, switch camera
  :help | :quit                 while scanning: this text, leave the shell
  camera                        switch back/front camera
  type <no_sampel>              enter a sample number by hand
  select <koding>               choose the active bottle
  qty <koding> <n>              set the prepared count
  show                          print the checklist
  submit | cancel               save the checklist, discard it
  help | quit";

/// A line typed while the scanner is open. Only the `:` commands below are
/// control input, every other line is decoded text.
#[derive(Debug, PartialEq, Eq)]
enum ScanInput<'a> {
    Blank,
    Help,
    Quit,
    Close,
    Camera,
    Payload(&'a str),
}

impl<'a> ScanInput<'a> {
    fn parse(line: &'a str) -> Self {
        match line {
            "" => Self::Blank,
            ":help" => Self::Help,
            ":quit" | ":exit" => Self::Quit,
            ":close" => Self::Close,
            ":camera" => Self::Camera,
            payload => Self::Payload(payload),
        }
    }
}

struct Shell {
    api: Arc<HttpApi>,
    session: BottleSession<Arc<HttpApi>, ConsoleCamera, NoticeLog>,
    feed: SampleFeed,
}

pub async fn run(mut config: Config, cameras: Vec<String>) -> Result<()> {
    let auth = config
        .token
        .take()
        .map(AuthSession::with_token)
        .unwrap_or_default();
    let api = Arc::new(HttpApi::new(&config, Arc::new(auth))?);
    info!("Using backend {}", config.api_url);

    let mut shell = Shell {
        api: api.clone(),
        session: BottleSession::new(api, ConsoleCamera::new(cameras), NoticeLog::default()),
        feed: SampleFeed::new(),
    };
    let mut input = BufReader::new(stdin()).lines();

    println!("{HELP}");

    loop {
        print!("{}> ", shell.session.state());
        stdout().flush()?;

        let Some(line) = input.next_line().await? else {
            break;
        };

        let keep_going = shell.handle(line.trim(), &mut input).await?;
        shell.flush_notices();

        if !keep_going {
            break;
        }
    }

    shell.session.cancel();

    Ok(())
}

impl Shell {
    async fn handle(&mut self, line: &str, input: &mut Input) -> Result<bool> {
        if self.session.state() == State::Scanning {
            match ScanInput::parse(line) {
                ScanInput::Blank => {}
                ScanInput::Help => println!("{HELP}"),
                ScanInput::Quit => return Ok(false),
                ScanInput::Close => {
                    self.session.close_scanner();
                }
                ScanInput::Camera => self.toggle_camera().await,
                ScanInput::Payload(payload) => {
                    let result = spin(
                        "Checking bottle list",
                        self.session.on_decoded(payload.to_string()),
                    )
                    .await;
                    report(result);
                }
            }

            return Ok(true);
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(false),
            "login" => self.login(rest, input).await?,
            "logout" => {
                self.api.auth().logout();
                self.session.cancel();
                println!("✔ You have been logged out");
            }
            "profile" => self.profile().await,
            "dashboard" => self.dashboard().await,
            "samples" => self.refresh_samples().await,
            "more" => self.more_samples().await,
            "register" => self.register(rest).await,
            "scan" => report(self.session.open_scanner().await),
            "camera" => self.toggle_camera().await,
            "type" => self.type_sample(rest).await,
            "select" => report(self.session.select_bottle(rest)),
            "qty" => self.quantity(rest),
            "show" => self.show(),
            "submit" => report(spin("Saving bottles", self.session.submit()).await),
            "cancel" => {
                self.session.cancel();
            }
            other => println!("unknown command {other}, try help"),
        }

        Ok(true)
    }

    async fn login(&mut self, rest: &str, input: &mut Input) -> Result<()> {
        let mut parts = rest.split_whitespace();
        let (Some(identity), Some(password)) = (parts.next(), parts.next()) else {
            println!("usage: login <username> <password>");
            return Ok(());
        };

        let attempt = spin(
            "Signing in",
            self.api.authenticate(identity, password, LoginMode::Login),
        )
        .await;

        match attempt {
            Ok(()) => {}
            Err(ApiError::AlreadyLoggedIn { message }) => {
                print!("{message}. Lanjutkan login? [y/N] ");
                stdout().flush()?;

                let answer = input.next_line().await?.unwrap_or_default();
                if !answer.trim().eq_ignore_ascii_case("y") {
                    return Ok(());
                }

                let retry = spin(
                    "Signing in",
                    self.api
                        .authenticate(identity, password, LoginMode::DestroySession),
                )
                .await;
                if let Err(e) = retry {
                    self.api_error(e);
                    return Ok(());
                }
            }
            Err(e) => {
                self.api_error(e);
                return Ok(());
            }
        }

        println!("✔ Signed in successfully");
        self.profile().await;

        Ok(())
    }

    async fn profile(&mut self) {
        match self.api.profile().await {
            Ok(profile) => {
                println!("{}", profile.name);
                println!("{} / {}", profile.pos, profile.dept);
            }
            Err(e) => self.api_error(e),
        }
    }

    async fn dashboard(&mut self) {
        match spin("Loading dashboard", self.api.dashboard()).await {
            Ok(dashboard) => {
                println!("Hari ini:  {} Sampel", dashboard.today);
                println!("Bulan ini: {} Sampel", dashboard.this_month);
            }
            Err(e) => self.api_error(e),
        }
    }

    async fn refresh_samples(&mut self) {
        match spin("Loading samples", self.feed.refresh(self.api.as_ref())).await {
            Ok(_) => print_samples(self.feed.items()),
            Err(e) => self.api_error(e),
        }
    }

    async fn more_samples(&mut self) {
        let shown = self.feed.items().len();

        match spin("Loading more samples", self.feed.load_more(self.api.as_ref())).await {
            Ok(0) => println!("no more samples"),
            Ok(_) => print_samples(&self.feed.items()[shown..]),
            Err(e) => self.api_error(e),
        }
    }

    async fn register(&mut self, no_sampel: &str) {
        if no_sampel.is_empty() {
            println!("usage: register <no_sampel>");
            return;
        }

        match spin("Registering sample", self.api.register_sample(no_sampel)).await {
            Ok(response) if response.status == ResultCode::OK => {
                println!("✔ {}", response.message.unwrap_or_default());
                self.refresh_samples().await;
            }
            Ok(response) => println!(
                "✘ {}",
                response
                    .message
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
            ),
            Err(e) => self.api_error(e),
        }
    }

    async fn toggle_camera(&mut self) {
        match self.session.toggle_camera().await {
            Ok(facing) => println!("camera: {facing}"),
            Err(e) => println!("✘ {e}"),
        }
    }

    async fn type_sample(&mut self, no_sampel: &str) {
        if let Err(e) = self.session.set_manual_text(no_sampel) {
            println!("✘ {e}");
            return;
        }

        report(spin("Checking bottle list", self.session.blur_manual()).await);
    }

    fn quantity(&mut self, rest: &str) {
        let Some((koding, value)) = rest.rsplit_once(' ') else {
            println!("usage: qty <koding> <n>");
            return;
        };

        // same leniency as a number input: junk and negatives read as 0
        let jumlah = value
            .trim()
            .parse::<i64>()
            .map_or(0, |n| u32::try_from(n.max(0)).unwrap_or(u32::MAX));

        match self.session.set_quantity(koding.trim(), jumlah) {
            Ok(stored) => println!("{} = {stored}", koding.trim()),
            Err(e) => println!("✘ {e}"),
        }
    }

    fn show(&self) {
        let session = &self.session;
        println!("state: {}", session.state());

        if let Some(sample) = session.active_sample() {
            println!("sample: {sample} (entered as {:?})", session.scanned_text());
        }

        let checklist = session.checklist();
        for entry in checklist.entries() {
            let marker = if session.active_bottle() == Some(entry.koding.as_str()) {
                '>'
            } else {
                ' '
            };
            let status = if entry.is_ready() { "ready" } else { "not ready" };

            if entry.category.tracks_quantity() {
                println!(
                    "{marker} {:<12} {:<24} {}/{} {status}",
                    entry.koding, entry.label, entry.jumlah, entry.disiapkan
                );
            } else {
                println!("{marker} {:<12} {:<24} {status}", entry.koding, entry.label);
            }
        }

        if !checklist.is_empty() {
            println!("{}/{} ready", checklist.ready_count(), checklist.len());
        }

        if session.quantity_input_visible() {
            if let Some(bottle) = session.active_bottle().and_then(|koding| checklist.get(koding)) {
                println!(
                    "qty {} <n> to set the count, {} required",
                    bottle.koding, bottle.disiapkan
                );
            }
        }

        if session.can_submit() {
            println!("submit to save");
        }
    }

    fn api_error(&mut self, e: ApiError) {
        println!("✘ {}", e.user_message());

        if matches!(e, ApiError::Forbidden { .. }) {
            self.session.cancel();
            println!("session ended, log in again");
        }
    }

    fn flush_notices(&mut self) {
        for notice in self.session.notifier_mut().drain() {
            match notice.level {
                Level::Success => println!("✔ {}", notice.message),
                Level::Error => println!("✘ {}", notice.message),
            }
        }
    }
}

fn report<T>(result: Result<T, SessionError>) {
    if let Err(e) = result {
        println!("✘ {e}");
    }
}

fn print_samples(samples: &[SampleSummary]) {
    for sample in samples {
        println!(
            "{:<20} {:<24} {}",
            sample.no_sample,
            sample.nama_lengkap,
            sample.received_display()
        );
    }
}

async fn spin<F: Future>(message: &'static str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();

    output
}

#[cfg(test)]
mod tests {
    use super::ScanInput;

    #[test]
    fn test_scan_commands_are_not_payloads() {
        assert_eq!(ScanInput::parse(":quit"), ScanInput::Quit);
        assert_eq!(ScanInput::parse(":exit"), ScanInput::Quit);
        assert_eq!(ScanInput::parse(":help"), ScanInput::Help);
        assert_eq!(ScanInput::parse(":close"), ScanInput::Close);
        assert_eq!(ScanInput::parse(":camera"), ScanInput::Camera);
        assert_eq!(ScanInput::parse(""), ScanInput::Blank);
    }

    #[test]
    fn test_other_lines_are_payloads() {
        assert_eq!(ScanInput::parse("SMP-001"), ScanInput::Payload("SMP-001"));
        assert_eq!(ScanInput::parse("quit"), ScanInput::Payload("quit"));
    }
}
