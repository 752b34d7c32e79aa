//! Cross-platform Inky example
//!
//! Draws a border, a title and one circle per ink, then shows the frame on
//! whatever display the factory picks: a real panel on a Raspberry Pi, a
//! desktop window anywhere else.
//!
//! Run with:
//!   cargo run -p inky --example cross_platform -- --type what --color red --simulate
//!   cargo run -p inky --example cross_platform -- --grid --fast --snapshot inky.png
//!
//! Set `RUST_LOG=inky=debug` for the selection trace.

#![allow(missing_docs)]
// Panel dimensions fit comfortably in i32.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use inky::specs::{ColorMode, RequestedFamily};
use inky::{
    Button, DebugAdapter, DisplayDriver, DisplayError, DisplayFactory, DisplayRequest,
    EmulatorConfig, IndexedImage, PaletteIndex, SimulatorBackend,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cross_platform")]
#[command(about = "Draw a demo frame on an Inky display or its simulator", long_about = None)]
struct Args {
    /// Display type (auto, phat, phatssd1608, what, whatssd1683, impressions, impressions73)
    #[arg(short = 't', long = "type", default_value = "auto")]
    display_type: RequestedFamily,

    /// Ink set for pHAT/wHAT panels (black, red, yellow)
    #[arg(short, long)]
    color: Option<ColorMode>,

    /// Force the simulator even on a Raspberry Pi
    #[arg(short, long)]
    simulate: bool,

    /// Overlay a coordinate grid
    #[arg(long)]
    grid: bool,

    /// Do not wait for refreshes to finish
    #[arg(long)]
    fast: bool,

    /// Show the ink test pattern instead of the demo frame
    #[arg(long)]
    test_pattern: bool,

    /// Emulator settings as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render to a PNG file instead of a window
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EmulatorConfig::from_json(&json)?
        }
        None => EmulatorConfig::default(),
    };

    let mut factory = DisplayFactory::new().emulator_config(config);
    if let Some(output) = &args.snapshot {
        factory = factory.simulator_backend(SimulatorBackend::Snapshot {
            output: Some(output.clone()),
        });
    }

    let mut request = DisplayRequest {
        family: args.display_type,
        color: args.color,
        ..DisplayRequest::default()
    };
    if args.simulate {
        request = request.simulate(true);
    }

    let display = factory.create(&request)?;
    let mut display = DebugAdapter::new(display);
    if args.grid {
        display.toggle_grid();
        display.toggle_coordinates();
    }
    if args.fast {
        display.enable_fast_mode();
    }

    for button in Button::ALL {
        let registered = display.register_button_handler(
            button,
            Box::new(|button| println!("Button {} pressed", button.label())),
        );
        match registered {
            Ok(()) => {}
            Err(DisplayError::Unsupported(_)) => {
                tracing::info!("display has no buttons");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if args.test_pattern {
        display.draw_test_pattern()?;
    } else {
        let frame = demo_frame(&display);
        display.set_image(&frame, 0.5);
        display.show(true)?;
    }

    println!("{}", display.report());
    println!("Close the window to exit.");
    display.wait_for_close()?;
    display.close()?;
    Ok(())
}

fn demo_frame(display: &impl DisplayDriver) -> IndexedImage {
    let descriptor = display.descriptor();
    let mode = descriptor.color_mode;
    let black = PaletteIndex::new(mode.black_index());
    let (width, height) = (descriptor.width(), descriptor.height());
    let mut image = IndexedImage::filled(width, height, mode.white_index());

    let _ = Rectangle::new(Point::new(2, 2), Size::new(width.saturating_sub(4), height.saturating_sub(4)))
        .into_styled(PrimitiveStyle::with_stroke(black, 2))
        .draw(&mut image);

    let _ = Text::new(
        "Inky",
        Point::new(12, 28),
        MonoTextStyle::new(&FONT_10X20, black),
    )
    .draw(&mut image);
    let _ = Text::new(
        &descriptor.to_string(),
        Point::new(12, 44),
        MonoTextStyle::new(&FONT_6X10, black),
    )
    .draw(&mut image);

    let inks = mode.inks();
    let diameter = (width / (inks.len() as u32 + 1)).min(height / 3).max(4);
    let top = (height / 2) as i32;
    for (slot, &(index, _)) in (1i32..).zip(inks) {
        let centre_x = slot * width as i32 / (inks.len() as i32 + 1);
        let top_left = Point::new(centre_x - diameter as i32 / 2, top);
        let _ = Circle::new(top_left, diameter)
            .into_styled(PrimitiveStyle::with_fill(PaletteIndex::new(index)))
            .draw(&mut image);
        let _ = Circle::new(top_left, diameter)
            .into_styled(PrimitiveStyle::with_stroke(black, 1))
            .draw(&mut image);
    }
    image
}
