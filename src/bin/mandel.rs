// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num_cpus;
extern crate rand;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use mandelbrot::{
    render, CalibrationSettings, CancelToken, Coloring, DomainColoring, Grid, LogObserver,
    PixelBuffer, RenderConfig, RenderContext,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const CENTER: &str = "center";
const RADIUS: &str = "radius";
const SAMPLES: &str = "samples";
const ITERATIONS: &str = "iterations";
const ESCAPE_RADIUS: &str = "escape-radius";
const AUTO: &str = "auto";
const BLACKNESS: &str = "blackness";
const SATURATION: &str = "saturation";
const COLORING: &str = "coloring";
const THREADS: &str = "threads";
const BULB: &str = "bulb";
const MIN_ITERATIONS: &str = "min-iterations";
const STEP: &str = "step";
const CEILING: &str = "ceiling";
const TIMEOUT: &str = "timeout";
const DOMAIN: &str = "domain";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot and domain coloring renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the extension picks the format (.png, .ppm, ...)"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the view as re,im"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .short("r")
                .takes_value(true)
                .default_value("2")
                .validator(|s| validate_number::<f64>(&s, "Could not parse draw radius"))
                .help("Half the width of the view"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .long(SAMPLES)
                .short("s")
                .takes_value(true)
                .default_value("250")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        20_000,
                        "Could not parse sample count",
                        "Sample count must be between 1 and 20000",
                    )
                })
                .help("Samples per axis; the image is square"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("64")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(ESCAPE_RADIUS)
                .long(ESCAPE_RADIUS)
                .short("e")
                .takes_value(true)
                .default_value("4")
                .validator(|s| validate_number::<f64>(&s, "Could not parse escape radius"))
                .help("Escape radius; should be at least 2"),
        )
        .arg(
            Arg::with_name(AUTO)
                .long(AUTO)
                .short("a")
                .help("Search for a maximum iteration count before rendering"),
        )
        .arg(
            Arg::with_name(BLACKNESS)
                .long(BLACKNESS)
                .short("b")
                .takes_value(true)
                .default_value("1")
                .validator(|s| validate_number::<f64>(&s, "Could not parse blackness limit"))
                .help("Largest acceptable fraction of black pixels for --auto"),
        )
        .arg(
            Arg::with_name(SATURATION)
                .long(SATURATION)
                .takes_value(true)
                .default_value("0.8")
                .validator(|s| validate_number::<f64>(&s, "Could not parse saturation"))
                .help("Color saturation"),
        )
        .arg(
            Arg::with_name(COLORING)
                .long(COLORING)
                .short("C")
                .takes_value(true)
                .default_value("fourth-root")
                .validator(|s| Coloring::from_str(&s).map(|_| ()))
                .help("iterative, histogram, smooth[:exponent], fourth-root or grayscale"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver; defaults to one per CPU"),
        )
        .arg(
            Arg::with_name(BULB)
                .long(BULB)
                .help("Also skip points inside the period-2 bulb"),
        )
        .arg(
            Arg::with_name(MIN_ITERATIONS)
                .long(MIN_ITERATIONS)
                .takes_value(true)
                .default_value("64")
                .validator(|s| validate_number::<usize>(&s, "Could not parse minimum iterations"))
                .help("First iteration count tried by --auto"),
        )
        .arg(
            Arg::with_name(STEP)
                .long(STEP)
                .takes_value(true)
                .default_value("32")
                .validator(|s| validate_number::<usize>(&s, "Could not parse iteration step"))
                .help("Iteration increase per --auto pass"),
        )
        .arg(
            Arg::with_name(CEILING)
                .long(CEILING)
                .takes_value(true)
                .default_value("1024")
                .validator(|s| validate_number::<usize>(&s, "Could not parse iteration ceiling"))
                .help("Highest iteration count --auto may choose"),
        )
        .arg(
            Arg::with_name(TIMEOUT)
                .long(TIMEOUT)
                .takes_value(true)
                .validator(|s| validate_number::<u64>(&s, "Could not parse timeout"))
                .help("Give up after this many seconds"),
        )
        .arg(
            Arg::with_name(DOMAIN)
                .long(DOMAIN)
                .short("d")
                .help(
                    "Draw a domain coloring of the identity instead of the Mandelbrot set; \
                     without --center, --radius or --samples it spans -10..10 at 500 samples",
                ),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .help("Log progress"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &PixelBuffer) -> Result<(), failure::Error> {
    let path = Path::new(outfile);
    let (width, height) = (pixels.width() as u32, pixels.height() as u32);
    let bytes = pixels.to_rgb_bytes();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("pnm") | Some("ppm") => {
            let output = File::create(&path)?;
            let mut encoder =
                PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
            encoder.encode(&bytes[..], width, height, ColorType::RGB(8))?;
        }
        _ => image::save_buffer(&path, &bytes, width, height, ColorType::RGB(8))?,
    }
    info!("Saved {}x{} image to {}", width, height, outfile);
    Ok(())
}

// clap has already validated every value read here.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, failure::Error> {
    let raw = matches.value_of(name).unwrap_or("");
    T::from_str(raw).map_err(|_| failure::format_err!("Could not parse --{} '{}'", name, raw))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let output = matches.value_of(OUTPUT).unwrap_or("");
    let (x, y) = parse_pair::<f64>(matches.value_of(CENTER).unwrap_or(""), ',')
        .ok_or_else(|| failure::format_err!("Could not parse center point"))?;
    let radius: f64 = value(matches, RADIUS)?;
    let samples: usize = value(matches, SAMPLES)?;

    if matches.is_present(DOMAIN) {
        // clap reports defaulted values as present, so count occurrences
        let explicit = [CENTER, RADIUS, SAMPLES]
            .iter()
            .any(|name| matches.occurrences_of(name) > 0);
        let grid = if explicit {
            Grid::build(x - radius, x + radius, y - radius, y + radius, samples)?
        } else {
            DomainColoring::default_grid()?
        };
        let pixels = DomainColoring::default().render(&grid, |z| z);
        return write_image(output, &pixels);
    }

    let mut config = RenderConfig::new()
        .center(x, y)
        .draw_radius(radius)
        .samples(samples)
        .max_iterations(value(matches, ITERATIONS)?)
        .escape_radius(value(matches, ESCAPE_RADIUS)?)
        .auto_max_iter(matches.is_present(AUTO))
        .blackness_limit(value(matches, BLACKNESS)?)
        .saturation(value(matches, SATURATION)?)
        .coloring(value(matches, COLORING)?)
        .bulb_check(matches.is_present(BULB))
        .calibration(CalibrationSettings {
            min_iterations: value(matches, MIN_ITERATIONS)?,
            step: value(matches, STEP)?,
            ceiling: value(matches, CEILING)?,
            ..CalibrationSettings::default()
        });
    if matches.is_present(THREADS) {
        config = config.threads(value(matches, THREADS)?);
    }
    let plan = config.configure()?;

    let cancel = if matches.is_present(TIMEOUT) {
        CancelToken::with_timeout(Duration::from_secs(value(matches, TIMEOUT)?))
    } else {
        CancelToken::new()
    };
    let observer = LogObserver;
    let ctx = RenderContext::new(&observer).with_cancel(cancel);
    let rendered = render(&plan, &ctx)?;

    if rendered
        .pixels
        .is_mostly_black(&mut rand::thread_rng(), 100, 0.85)
    {
        warn!(
            "The image is mostly black at {} iterations; try --auto or a higher --iterations",
            rendered.plan.max_iterations()
        );
    }
    write_image(output, &rendered.pixels)
}

fn main() {
    let matches = args();
    let level = if matches.is_present(VERBOSE) { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
