// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

use std::cell::RefCell;
use std::rc::Rc;

use sensor_viewer_common::chart::{self, TICK_LABEL_ROTATION};
use sensor_viewer_common::{node, PaneFrame, Poller, Renderer, Series, ViewerConfig};
use slint::{ModelRc, VecModel};

/// Our App struct that holds the UI and the poller.
/// It also holds a timer that polls the sensor node every 5 seconds.
///
/// On every tick the poller fetches the node's latest batch and rebuilds the series.
/// The series is then turned into chart panes and handed to the UI.
///
/// The poller only lives on the UI thread, so an Rc<RefCell> is all the sharing it needs.
struct App {
    ui: AppWindow,
    config: ViewerConfig,
    poller: Rc<RefCell<Poller>>,
    renderer: Renderer,
    timer: slint::Timer,
}

impl App {
    /// Create a new App struct.
    ///
    /// The App struct initializes the UI and picks the sensor node to poll.
    fn new() -> anyhow::Result<Self> {
        // Make a new AppWindow
        let ui = AppWindow::new()?;

        // Everything is fixed at build time, see ViewerConfig.
        let config = ViewerConfig::default();
        let poller = Rc::new(RefCell::new(Poller::new(node::from_config(&config)?)));
        let renderer = Renderer::new(&config);

        // Show empty axes until the first batch arrives
        {
            let model = ui.global::<ViewModel>();
            model.set_tick_label_rotation(TICK_LABEL_ROTATION);
            model.set_status("Waiting for the first batch...".into());
            show_series(&model, &renderer, poller.borrow().series());
        }

        // Return the App struct
        Ok(Self {
            ui,
            config,
            poller,
            renderer,
            timer: slint::Timer::default(),
        })
    }

    /// Run the App, start the timer and poll the sensor node periodically.
    fn run(&mut self) -> anyhow::Result<()> {
        // Get the handle to the UI as a weak reference.
        let ui_handle = self.ui.as_weak();

        // Clone the poller, because we need to access it in the timer closure.
        let poller = self.poller.clone();
        let renderer = self.renderer;

        let update = move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let model = ViewModel::get(&ui);
            let mut state = poller.borrow_mut();

            // A failed poll keeps the last good charts and only reports in the status line.
            let status = match state.tick() {
                Ok(samples) => {
                    show_series(&model, &renderer, state.series());
                    format!(
                        "Updated {}, {} samples",
                        chrono::Local::now().format("%H:%M:%S"),
                        samples
                    )
                }
                Err(e) => e.to_string(),
            };
            model.set_status(status.into());
        };

        // Poll once as soon as the event loop runs, then on every interval.
        slint::Timer::single_shot(std::time::Duration::ZERO, update.clone());
        self.timer
            .start(slint::TimerMode::Repeated, self.config.poll_interval, update);

        // Run the UI (and map an error to an anyhow::Error).
        self.ui.run().map_err(|e| e.into())
    }
}

/// Redraws all three panes from scratch.
fn show_series(model: &ViewModel, renderer: &Renderer, series: &Series) {
    let panes: Vec<ChartPane> = renderer.render(series).iter().map(ChartPane::from).collect();
    model.set_panes(model_of(panes));
}

fn model_of<T: Clone + 'static>(items: Vec<T>) -> ModelRc<T> {
    Rc::new(VecModel::from(items)).into()
}

/// Convert a computed frame into the pane the UI draws.
impl From<&PaneFrame> for ChartPane {
    fn from(frame: &PaneFrame) -> Self {
        let (r, g, b) = frame.sensor.color();

        Self {
            label: frame.sensor.label().into(),
            color: slint::Color::from_rgb_u8(r, g, b),
            line_commands: frame.line.as_str().into(),
            markers: model_of(
                frame
                    .markers
                    .iter()
                    .map(|m| Marker {
                        x: m.x as f32,
                        y: m.y as f32,
                    })
                    .collect(),
            ),
            x_ticks: model_of(frame.x_ticks.iter().map(Tick::from).collect()),
            y_ticks: model_of(frame.y_ticks.iter().map(Tick::from).collect()),
            x_label: frame.x_label.unwrap_or_default().into(),
        }
    }
}

impl From<&chart::Tick> for Tick {
    fn from(tick: &chart::Tick) -> Self {
        Self {
            position: tick.position as f32,
            label: tick.label.as_str().into(),
        }
    }
}

/// A minimal main function that initializes the logger and the App and runs it.
fn main() -> anyhow::Result<()> {
    // Failed polls are reported on stderr even without RUST_LOG set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = App::new()?;

    app.run()
}
