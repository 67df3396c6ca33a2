use std::fs;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::bail;
use crossterm::queue;
use crossterm::style;
use crossterm::style::Color;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixel_life::color::Rgba;
use pixel_life::config::Boundary;
use pixel_life::config::GridConfig;
use pixel_life::grid::Grid;
use pixel_life::pattern::Pattern;
use pixel_life::render::HEARTS;
use pixel_life::rule_set::RuleSet;

const USAGE: &str = "\
Usage: pixel-life [OPTIONS] [PATTERN.rle]

Options:
  --size WxH        grid dimensions (default 20x20, or the RLE header size)
  --steps N         generations to advance before drawing
  --rule RULE       rulestring such as B3/S23
  --clamp           cells past the edge are dead instead of wrapping around
  --seed N          fill the grid pseudo-randomly from seed N
  --density P       live cell probability for --seed (default 0.5)
  --pattern NAME    place a built-in pattern at the top-left corner
  --braille         print the text rendering as braille
  --hearts          print the text rendering as coloured hearts
  --text-only       skip the pixel blit
  -h, --help        print this message";

const DEFAULT_SIZE: (u32, u32) = (20, 20);

#[derive(Debug, Default, PartialEq)]
struct Options {
    size: Option<(u32, u32)>,
    steps: u64,
    rule: Option<RuleSet>,
    clamp: bool,
    seed: Option<u64>,
    density: Option<f64>,
    pattern: Option<&'static Pattern>,
    braille: bool,
    hearts: bool,
    text_only: bool,
    rle: Option<PathBuf>,
    help: bool,
}

impl Options {
    fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("{name} expects a value"))
            };

            match arg.as_str() {
                "--size" => opts.size = Some(parse_size(&value("--size")?)?),
                "--steps" => {
                    opts.steps = value("--steps")?
                        .parse()
                        .context("--steps expects a whole number")?
                }
                "--rule" => {
                    let rule = value("--rule")?;
                    opts.rule = Some(
                        rule.parse()
                            .with_context(|| format!("Invalid rule \"{rule}\""))?,
                    )
                }
                "--clamp" => opts.clamp = true,
                "--seed" => {
                    opts.seed = Some(
                        value("--seed")?
                            .parse()
                            .context("--seed expects a whole number")?,
                    )
                }
                "--density" => {
                    opts.density = Some(
                        value("--density")?
                            .parse()
                            .context("--density expects a number")?,
                    )
                }
                "--pattern" => {
                    let name = value("--pattern")?;
                    let Some(pattern) = Pattern::find(&name) else {
                        bail!("Unknown pattern \"{name}\"")
                    };
                    opts.pattern = Some(pattern);
                }
                "--braille" => opts.braille = true,
                "--hearts" => opts.hearts = true,
                "--text-only" => opts.text_only = true,
                "-h" | "--help" => opts.help = true,
                flag if flag.starts_with('-') => bail!("Unknown option \"{flag}\""),
                path => {
                    if opts.rle.is_some() {
                        bail!("Only one pattern file can be given")
                    }

                    opts.rle = Some(PathBuf::from(path));
                }
            }
        }

        Ok(opts)
    }

    fn config(&self) -> GridConfig {
        let mut config = GridConfig::default();

        if let Some(rule) = self.rule {
            config = config.with_rule(rule);
        }

        if self.clamp {
            config = config.with_boundary(Boundary::Clamp);
        }

        config
    }
}

fn parse_size(s: &str) -> anyhow::Result<(u32, u32)> {
    let Some((w, h)) = s.split_once(['x', 'X']) else {
        bail!("Size must look like WxH, got \"{s}\"")
    };

    let w = w.parse().with_context(|| format!("Invalid width \"{w}\""))?;
    let h = h.parse().with_context(|| format!("Invalid height \"{h}\""))?;

    Ok((w, h))
}

fn build_grid(opts: &Options) -> anyhow::Result<Grid> {
    let config = opts.config();

    let mut grid = match (&opts.rle, opts.size) {
        (Some(path), None) => {
            let bytes = fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
            let mut grid = Grid::from_rle(&bytes, config)
                .with_context(|| format!("Failed to load {path:?}"))?;

            // The command line rule wins over the file's
            if let Some(rule) = opts.rule {
                grid.set_rule(rule);
            }

            grid
        }
        (rle, size) => {
            let (w, h) = size.unwrap_or(DEFAULT_SIZE);
            let mut grid = Grid::with_config(w, h, config)?;

            if let Some(path) = rle {
                let bytes = fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
                let file = grid
                    .load_rle(&bytes, 0, 0)
                    .with_context(|| format!("Failed to load {path:?}"))?;

                if let Some(name) = file.name {
                    info!(name = %String::from_utf8_lossy(name), "loaded pattern");
                }
            }

            grid
        }
    };

    if let Some(seed) = opts.seed {
        grid.fill_random(seed, opts.density.unwrap_or(0.5));
    }

    if let Some(pattern) = opts.pattern {
        grid.place(pattern, 0, 0)
            .with_context(|| format!("Pattern \"{}\" does not fit", pattern.name))?;
    }

    grid.step_n(opts.steps);

    Ok(grid)
}

/// Copy the pixel buffer onto the terminal, two columns per pixel so cells come out square.
fn blit<W: Write>(out: &mut W, grid: &Grid) -> io::Result<()> {
    let row_len = grid.width() as usize * 4;

    for row in grid.pixels().chunks_exact(row_len) {
        for px in row.chunks_exact(4).filter_map(|px| <[u8; 4]>::try_from(px).ok()) {
            let [r, g, b] = Rgba::from_bytes(px).over(Rgba::WHITE);

            queue!(
                out,
                style::SetBackgroundColor(Color::Rgb { r, g, b }),
                style::Print("  ")
            )?;
        }

        queue!(out, style::ResetColor, style::Print("\n"))?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let opts = Options::parse(std::env::args().skip(1))?;

    if opts.help {
        println!("{USAGE}");
        return Ok(());
    }

    let grid = build_grid(&opts)?;

    info!(
        width = grid.width(),
        height = grid.height(),
        generation = grid.generation(),
        population = grid.population(),
        "drawing"
    );

    let mut stdout = io::stdout().lock();

    if !opts.text_only {
        blit(&mut stdout, &grid)?;
        writeln!(stdout)?;
    }

    let text = if opts.hearts {
        grid.render_nearest(HEARTS)
            .context("No swatches to draw with")?
    } else if opts.braille {
        grid.render_braille()
    } else {
        grid.render()
    };

    write!(stdout, "{text}")?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::Options;
    use pixel_life::pattern::GLIDER;

    fn parse(args: &[&str]) -> anyhow::Result<Options> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let opts = parse(&[]).unwrap();

        assert_eq!(opts, Options::default());

        let grid = super::build_grid(&opts).unwrap();
        assert_eq!((grid.width(), grid.height()), super::DEFAULT_SIZE);
    }

    #[test]
    fn all_flags() {
        let opts = parse(&[
            "--size", "8x6", "--steps", "4", "--rule", "B36/S23", "--clamp", "--pattern",
            "glider", "--braille", "--hearts", "--text-only", "life.rle",
        ])
        .unwrap();

        assert_eq!(opts.size, Some((8, 6)));
        assert_eq!(opts.steps, 4);
        assert_eq!(opts.rule.map(|r| r.to_string()), Some("B36/S23".to_string()));
        assert!(opts.clamp && opts.braille && opts.hearts && opts.text_only);
        assert_eq!(opts.pattern, Some(&GLIDER));
        assert_eq!(opts.rle.as_deref(), Some(std::path::Path::new("life.rle")));
    }

    #[test]
    fn bad_input() {
        assert!(parse(&["--size", "8"]).is_err());
        assert!(parse(&["--size", "0x"]).is_err());
        assert!(parse(&["--steps"]).is_err());
        assert!(parse(&["--rule", "B9/S"]).is_err());
        assert!(parse(&["--pattern", "spaceship"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["a.rle", "b.rle"]).is_err());
    }

    #[test]
    fn glider_then_steps() {
        let opts = parse(&["--size", "6x6", "--pattern", "glider", "--steps", "4"]).unwrap();

        let grid = super::build_grid(&opts).unwrap();

        assert_eq!(grid.generation(), 4);
        assert_eq!(grid.population(), 5);
    }

    #[test]
    fn blit_writes_every_pixel() {
        let grid = pixel_life::grid::Grid::new(3, 2).unwrap();
        let mut out = Vec::new();

        super::blit(&mut out, &grid).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("  ").count(), 6);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn blit_uses_cell_colours() {
        let mut grid = pixel_life::grid::Grid::new(2, 1).unwrap();
        grid.set(0, 0, pixel_life::Cell::Alive).unwrap();
        let mut out = Vec::new();

        super::blit(&mut out, &grid).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("48;2;0;0;0m"), "{out:?}");
        assert!(out.contains("48;2;255;255;255m"), "{out:?}");
    }
}
