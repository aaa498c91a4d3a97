#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use embassy_executor::Executor;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::log::EspLogger;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::link_patches;
    use ha_dash::display::Display;
    use ha_dash::logging::print_splash_screen;
    use ha_dash::tasks::{dashboard_task, touch_task};
    use ha_dash::touch::Gt911;
    use log::{error, info};

    link_patches();
    EspLogger::initialize_default();
    print_splash_screen();

    let peripherals = Peripherals::take().context("Failed to take Peripherals")?;
    let sys_loop = EspSystemEventLoop::take().context("Failed to take system event loop")?;
    let nvs = EspDefaultNvsPartition::take().context("Failed to take NVS partition")?;

    let display = Display::new(peripherals.pins.gpio2).context("Failed to init display")?;
    let touch = Gt911::new(
        peripherals.i2c0,
        peripherals.pins.gpio19,
        peripherals.pins.gpio20,
    )
    .context("Failed to init touch controller")?;

    info!("\x1b[38;5;27m✅ Hardware initialized, starting executor\x1b[0m");

    let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
    executor.run(|spawner| {
        if let Err(e) = spawner.spawn(dashboard_task(
            spawner,
            display,
            peripherals.modem,
            sys_loop,
            nvs,
        )) {
            error!("‼️ Could not spawn dashboard task: {:?}", e);
        }
        if let Err(e) = spawner.spawn(touch_task(touch)) {
            error!("‼️ Could not spawn touch task: {:?}", e);
        }
    })
}

/// Host preview: renders the dashboard with fixed data into a PPM image.
///
/// `ha-dash [OUT.ppm] [--fahrenheit] [--light] [--loading]`
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use anyhow::{Context, bail};
    use ha_dash::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use ha_dash::framebuffer::Framebuffer;
    use ha_dash::models::WeatherSnapshot;
    use ha_dash::ui::{PresentationState, UiEvent, render};
    use std::fs::File;
    use std::io::BufWriter;

    let mut output = String::from("dashboard.ppm");
    let mut events = Vec::new();
    let mut loading = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--fahrenheit" => events.push(UiEvent::ToggleUnit),
            "--light" => events.push(UiEvent::ToggleTheme),
            "--loading" => loading = true,
            flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
            path => output = path.to_string(),
        }
    }

    let mut ui = PresentationState::create();
    ui.set_wifi_status(true);
    ui.update(&WeatherSnapshot::preview());
    ui.show_loading(loading);
    for event in events {
        ui.handle_event(event);
    }

    let mut frame = Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    if let Err(never) = render::draw(&ui, &mut frame) {
        match never {}
    }

    let file = File::create(&output).with_context(|| format!("Failed to create {}", output))?;
    frame
        .write_ppm(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", output))?;

    println!("Wrote {}x{} preview to {}", SCREEN_WIDTH, SCREEN_HEIGHT, output);
    Ok(())
}
