// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

use usvg::fontdb;

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn timed<F, T>(perf: bool, name: &str, mut f: F) -> T
where
    F: FnMut() -> T,
{
    let now = std::time::Instant::now();
    let result = f();
    if perf {
        let elapsed = now.elapsed().as_micros() as f64 / 1000.0;
        println!("{}: {:.2}ms", name, elapsed);
    }

    result
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    let mut svg_data = timed(args.perf, "Reading", || -> Result<Vec<u8>, &str> {
        if let InputFrom::File(ref file) = args.in_svg {
            std::fs::read(file).map_err(|_| "failed to open the provided file")
        } else {
            use std::io::Read;
            let mut buf = Vec::new();
            let stdin = std::io::stdin();
            let mut handle = stdin.lock();
            handle
                .read_to_end(&mut buf)
                .map_err(|_| "failed to read stdin")?;
            Ok(buf)
        }
    })?;

    if svg_data.starts_with(&[0x1f, 0x8b]) {
        svg_data = timed(args.perf, "SVGZ Decoding", || {
            usvg::decompress_svgz(&svg_data).map_err(|e| e.to_string())
        })?;
    }

    // Dimensions the user didn't set come from the document itself.
    let target = {
        let proposed = svg2png::propose_target(&svg_data);
        let width = args.width.unwrap_or_else(|| proposed.width());
        let height = args.height.unwrap_or_else(|| proposed.height());
        // Unwrap is safe, because both values were already bound-checked.
        let mut target = svg2png::TargetBox::new(width, height).unwrap();
        target.keep_aspect_ratio = args.keep_aspect_ratio;
        target
    };

    let mut fontdb = fontdb::Database::new();
    timed(args.perf, "FontDB", || load_fonts(&args, &mut fontdb));

    let opt = svg2png::Options {
        target,
        background: args.background,
        resources_dir: args.resources_dir.clone(),
        fontdb,
    };

    let png = timed(args.perf, "Converting", || {
        svg2png::convert(&svg_data, &opt).map_err(|e| e.to_string())
    })?;

    match args.out_png {
        OutputTo::Stdout => {
            use std::io::Write;
            std::io::stdout()
                .write_all(png.data())
                .map_err(|_| "failed to write to stdout")?;
        }
        OutputTo::File(ref file) => {
            timed(args.perf, "Saving", || {
                png.save(file)
                    .map_err(|_| format!("failed to create the file {:?}", file))
            })?;
        }
    };

    Ok(())
}

const HELP: &str = "\
svg2png is an SVG to PNG conversion tool.

USAGE:
  svg2png [OPTIONS] <in-svg> [out-png]  # from file to file
  svg2png [OPTIONS] <in-svg> -c         # from file to stdout
  svg2png [OPTIONS] - <out-png>         # from stdin to file

  svg2png in.svg
  svg2png -w 1024 --background '#fff' in.svg out.png

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version
  -c                            Prints the output PNG to the stdout

  -w, --width LENGTH            Sets the output width in pixels
                                [default: the document's own width, capped at 2048]
                                [possible values: 1..4096 (inclusive)]
  -h, --height LENGTH           Sets the output height in pixels
                                [default: the document's own height, capped at 2048]
                                [possible values: 1..4096 (inclusive)]
      --ignore-aspect-ratio     Stretches the document to the target size
                                instead of fitting it inside
      --background COLOR        Sets the background color
                                Examples: red, #fff, #fff000
                                [default: transparent]

      --resources-dir DIR       Sets a directory that will be used during
                                relative paths resolving.
                                Expected to be the same as the directory that
                                contains the SVG file, but can be set to any.
                                [default: input file directory]
      --use-font-file PATH      Loads a specified font file into the fonts database.
                                Will be used during text to path conversion.
                                This option can be set multiple times
      --use-fonts-dir PATH      Loads all fonts from the specified directory
                                into the fonts database.
                                Will be used during text to path conversion.
                                This option can be set multiple times
      --skip-system-fonts       Disables system fonts loading

      --perf                    Prints performance stats
      --quiet                   Disables warnings

ARGS:
  <in-svg>                      Input file
  [out-png]                     Output file
                                [default: the input file name with a `png` extension]
";

#[derive(Debug)]
struct CliArgs {
    width: Option<u32>,
    height: Option<u32>,
    ignore_aspect_ratio: bool,
    background: Option<svg2png::Background>,

    resources_dir: Option<path::PathBuf>,
    font_files: Vec<path::PathBuf>,
    font_dirs: Vec<path::PathBuf>,
    skip_system_fonts: bool,

    perf: bool,
    quiet: bool,

    input: String,
    output: Option<String>,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(CliArgs {
        width: input.opt_value_from_fn(["-w", "--width"], parse_length)?,
        height: input.opt_value_from_fn(["-h", "--height"], parse_length)?,
        ignore_aspect_ratio: input.contains("--ignore-aspect-ratio"),
        background: input.opt_value_from_str("--background")?,

        resources_dir: input
            .opt_value_from_str("--resources-dir")
            .unwrap_or_default(),
        font_files: input.values_from_str("--use-font-file")?,
        font_dirs: input.values_from_str("--use-fonts-dir")?,
        skip_system_fonts: input.contains("--skip-system-fonts"),

        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.opt_free_from_str()?,
    })
}

fn parse_length(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid length")?;

    if (1..=svg2png::MAX_TARGET_SIZE).contains(&n) {
        Ok(n)
    } else {
        Err("LENGTH out of bounds".to_string())
    }
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom {
    Stdin,
    File(path::PathBuf),
}

#[derive(Clone, PartialEq, Debug)]
enum OutputTo {
    Stdout,
    File(path::PathBuf),
}

struct Args {
    in_svg: InputFrom,
    out_png: OutputTo,
    width: Option<u32>,
    height: Option<u32>,
    keep_aspect_ratio: bool,
    background: svg2png::Background,
    resources_dir: Option<path::PathBuf>,
    font_files: Vec<path::PathBuf>,
    font_dirs: Vec<path::PathBuf>,
    skip_system_fonts: bool,
    perf: bool,
    quiet: bool,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    let in_svg = if args.input == "-" {
        InputFrom::Stdin
    } else if args.input == "-c" {
        return Err("-c should be set after input".to_string());
    } else {
        InputFrom::File(args.input.as_str().into())
    };

    let out_png = match args.output {
        Some(ref out) if out == "-c" => OutputTo::Stdout,
        Some(out) => OutputTo::File(out.into()),
        None => OutputTo::File(default_out_png(&in_svg)),
    };

    if args.input == "-" && args.resources_dir.is_none() {
        println!("Warning: Make sure to set --resources-dir when reading SVG from stdin.");
    }

    let resources_dir = match args.resources_dir {
        Some(v) => Some(v),
        None if args.input != "-" => {
            // Get input file absolute directory.
            std::fs::canonicalize(&args.input)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        }
        None => None,
    };

    Ok(Args {
        in_svg,
        out_png,
        width: args.width,
        height: args.height,
        keep_aspect_ratio: !args.ignore_aspect_ratio,
        background: args.background.unwrap_or_default(),
        resources_dir,
        font_files: args.font_files,
        font_dirs: args.font_dirs,
        skip_system_fonts: args.skip_system_fonts,
        perf: args.perf,
        quiet: args.quiet,
    })
}

/// The input file name with a `.svg` suffix swapped for `.png`.
///
/// Anything else, stdin included, becomes `converted.png`.
fn default_out_png(input: &InputFrom) -> path::PathBuf {
    if let InputFrom::File(ref file) = input {
        let name = file.file_name().and_then(|n| n.to_str());
        if let Some(stem) = name.and_then(|n| n.strip_suffix(".svg")) {
            return file.with_file_name(format!("{}.png", stem));
        }
    }

    path::PathBuf::from("converted.png")
}

fn load_fonts(args: &Args, fontdb: &mut fontdb::Database) {
    if !args.skip_system_fonts {
        fontdb.load_system_fonts();
    }

    for path in &args.font_files {
        if let Err(e) = fontdb.load_font_file(path) {
            log::warn!("Failed to load '{}' cause {}.", path.display(), e);
        }
    }

    for path in &args.font_dirs {
        fontdb.load_fonts_dir(path);
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
