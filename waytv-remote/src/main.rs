//! waytv remote
//!
//! Wires the keypad and terminal input loops to the command dispatcher and
//! prints what happens. Three tasks run side by side: the device poll loop
//! on a blocking thread, the terminal reader and the dispatcher actor.

mod args;
mod output;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waytv_control::{
    run_dispatcher, AdbBridge, Bridge, ControlEvent, Dispatcher, DriverConfig, SessionManager,
    Switchboard, Timing, WaydroidSession,
};
use waytv_core::Command;
use waytv_input::{
    discover_devices, run_terminal_loop, CancelFlag, DeviceMux, InputDevice, InputError,
};
use waytv_sim::{RecordingBridge, ScriptedSession};

use args::Args;
use settings::Settings;

/// Exit status when no input device can be opened
const EXIT_NO_INPUT: u8 = 2;

/// How long runtime shutdown waits for a blocked stdin read
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            if matches!(e.downcast_ref::<InputError>(), Some(InputError::NoInputSources)) {
                ExitCode::from(EXIT_NO_INPUT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(level: Option<&str>) {
    // Include all our crates in the default filter
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(format!(
            "waytv={level},waytv_core={level},waytv_control={level},waytv_input={level},waytv_sim={level}"
        )),
        None => tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "waytv=info,waytv_core=info,waytv_control=info,waytv_input=info,waytv_sim=info"
                .into()
        }),
    };

    // stdout belongs to the operator output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::load(args.config.as_deref());
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    info!("Starting waytv remote");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let result = runtime.block_on(remote(args, settings));
    // The terminal reader may still sit in a blocking stdin read
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn remote(args: Args, settings: Settings) -> anyhow::Result<()> {
    let devices = if args.terminal_only {
        Vec::new()
    } else {
        DeviceMux::open_all(&device_paths(&args, &settings))?
    };

    let cancel = CancelFlag::new();
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(64);
    let (event_tx, event_rx) = mpsc::channel::<ControlEvent>(256);
    let poll_timeout = settings.poll_timeout();

    print!("{}", output::banner(&settings.digits));
    let printer = tokio::spawn(output::print_events(event_rx));

    let dispatcher = if args.dry_run {
        info!("Dry run: key events are logged, not sent");
        let config = DriverConfig {
            timing: Timing::instant(),
            ..settings.driver.clone()
        };
        spawn_dispatcher(
            RecordingBridge::new(),
            ScriptedSession::stopped(),
            config,
            &settings,
            cmd_rx,
            event_tx,
        )
    } else {
        let session = WaydroidSession::detect(settings.session.clone()).await;
        let bridge = AdbBridge::new(
            settings.session.adb_path.clone(),
            settings.adb_serial.clone(),
        );
        spawn_dispatcher(bridge, session, settings.driver.clone(), &settings, cmd_rx, event_tx)
    };

    let device_loop = (!devices.is_empty())
        .then(|| spawn_device_loop(devices, &cmd_tx, &cancel, poll_timeout));

    let terminal_loop = (!args.no_terminal).then(|| {
        let reader = BufReader::new(tokio::io::stdin());
        tokio::spawn(run_terminal_loop(
            reader,
            cmd_tx.clone(),
            cancel.clone(),
            poll_timeout,
        ))
    });

    if device_loop.is_none() && terminal_loop.is_none() {
        warn!("Neither input devices nor the terminal are enabled");
    }

    // The dispatcher stops once every input loop has dropped its sender
    drop(cmd_tx);
    if let Err(e) = dispatcher.await {
        error!("Dispatcher task failed: {}", e);
    }
    cancel.cancel();

    if let Some(handle) = device_loop {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Device loop failed: {}", e),
            Err(e) => error!("Device loop task failed: {}", e),
        }
    }
    if let Some(handle) = terminal_loop {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Terminal loop failed: {}", e),
            Err(e) => error!("Terminal loop task failed: {}", e),
        }
    }
    let _ = printer.await;

    info!("waytv remote stopped");
    Ok(())
}

/// Explicit `--device` paths, then configured ones, then a scan
fn device_paths(args: &Args, settings: &Settings) -> Vec<PathBuf> {
    if !args.device.is_empty() {
        return args.device.clone();
    }
    if !settings.devices.is_empty() {
        return settings.devices.clone();
    }

    let dir = args.input_dir.as_deref().unwrap_or(&settings.input_dir);
    discover_devices(dir).unwrap_or_else(|e| {
        warn!("{}", e);
        Vec::new()
    })
}

fn spawn_dispatcher<B, S>(
    bridge: B,
    session: S,
    config: DriverConfig,
    settings: &Settings,
    cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<ControlEvent>,
) -> JoinHandle<()>
where
    B: Bridge + 'static,
    S: SessionManager + Send + 'static,
{
    let dispatcher = Dispatcher::new(
        Switchboard::new(bridge, config),
        session,
        settings.digits.clone(),
    );
    tokio::spawn(async move {
        run_dispatcher(dispatcher, cmd_rx, event_tx).await;
    })
}

fn spawn_device_loop(
    devices: Vec<InputDevice>,
    cmd_tx: &mpsc::Sender<Command>,
    cancel: &CancelFlag,
    poll_timeout: Duration,
) -> JoinHandle<Result<(), InputError>> {
    let mut mux = DeviceMux::new(devices, cmd_tx.clone(), cancel.clone(), poll_timeout);
    tokio::task::spawn_blocking(move || mux.run())
}
