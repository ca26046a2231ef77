use clap::Parser;
use pixgrid::host::recorder::RecordingHost;
use pixgrid::host::terminal::{FrameBuffered, TerminalHost, TerminalSession};
use pixgrid::rendering::color::Rgba;
use pixgrid::rendering::drawable::{Drawable, Grid};
use pixgrid::rendering::image::Image;
use pixgrid::rendering::images::cursor;
use pixgrid::rendering::tga::TgaImage;
use pixgrid::{DEFAULT_TICK_RATE, FrameDriver, Game, Input, Renderer, UpdateInfo, run};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

static SHEET: &[u8] = include_bytes!("../assets/sheet.tga");

/// Draws text, a sprite sheet tile and a mouse cursor in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Frames per second to aim for. 0 disables the limit.
    #[arg(long, default_value_t = 60.0, value_parser = parse_fps)]
    fps: f64,

    /// Fixed updates per second.
    #[arg(long, default_value_t = DEFAULT_TICK_RATE, value_parser = parse_tick_rate)]
    tick_rate: f64,

    /// Record every presented frame and save the recording here on exit.
    #[arg(long)]
    record: Option<PathBuf>,
}

fn parse_fps(arg: &str) -> Result<f64, String> {
    let fps: f64 = arg.parse().map_err(|err| format!("{err}"))?;
    if fps == 0.0 || Duration::try_from_secs_f64(fps.recip()).is_ok() {
        Ok(fps)
    } else {
        Err(format!("{fps} is not a frame rate that can be slept to"))
    }
}

fn parse_tick_rate(arg: &str) -> Result<f64, String> {
    let rate: f64 = arg.parse().map_err(|err| format!("{err}"))?;
    if rate.is_finite() && rate > 0.0 && rate.recip().is_finite() {
        Ok(rate)
    } else {
        Err(format!("{rate} is not a positive tick rate"))
    }
}

struct Demo<'a> {
    sheet: Grid<TgaImage<'a>>,
    cursor: Image,
    mouse: (i64, i64),
}

impl Game for Demo<'_> {
    fn update(&mut self, input: &Input, _info: UpdateInfo) {
        self.mouse = input.mouse;
    }

    fn frame(&mut self, renderer: &mut Renderer) {
        renderer.clear(Rgba::DARK_BLUE);
        renderer.text("Hello, world!", 1, 1, Rgba::WHITE);
        renderer.draw(&self.sheet.cell(0, 0), 1, 16);
        renderer.draw(&self.sheet.cell(1, 0), 18, 16);
        let (mx, my) = self.mouse;
        renderer.draw(&self.cursor, mx - 1, my - 1);
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let demo = Demo {
        sheet: TgaImage::parse(SHEET)?.grid(16, 16),
        cursor: cursor(),
        mouse: (0, 0),
    };
    let target_fps = (args.fps > 0.0).then_some(args.fps);

    let host = TerminalHost::new(FrameBuffered::stdout())?;
    let mut driver = FrameDriver::new(demo, 0, 0).with_tick_rate(args.tick_rate);

    let session = TerminalSession::start()?;
    let result = match &args.record {
        Some(_) => {
            let mut host = RecordingHost::new(host);
            run(&mut driver, &mut host, target_fps).map(|()| Some(host.into_parts().1))
        }
        None => {
            let mut host = host;
            run(&mut driver, &mut host, target_fps).map(|()| None)
        }
    };
    session.end()?;

    if let (Some(path), Some(recording)) = (&args.record, result?) {
        recording.save(path)?;
    }
    Ok(())
}
