use pixel_life::Grid;
use pixel_life::GridConfig;
use pixel_life::color::Palette;
use pixel_life::color::Rgba;
use pixel_life::pattern;
use pixel_life::render::Glyphs;
use pixel_life::render::HEARTS;

fn glider(config: GridConfig) -> Grid {
    let mut grid = Grid::with_config(5, 4, config).unwrap();
    grid.place(&pattern::GLIDER, 0, 0).unwrap();

    grid
}

#[test]
fn glider_blocks() {
    let grid = glider(GridConfig::default());

    insta::assert_snapshot!(grid.render(), @r"
    □■□□□
    □□■□□
    ■■■□□
    □□□□□
    ");
}

#[test]
fn glider_ascii_after_steps() {
    let config = GridConfig::default().with_glyphs(Glyphs::ASCII);
    let mut grid = Grid::with_config(6, 6, config).unwrap();
    grid.place(&pattern::GLIDER, 0, 0).unwrap();

    grid.step_n(4);

    insta::assert_snapshot!(grid.render(), @r"
    ......
    ..#...
    ...#..
    .###..
    ......
    ......
    ");
}

#[test]
fn render_with_overrides_config() {
    let grid = glider(GridConfig::default());

    let custom = Glyphs {
        alive: '@',
        dead: ' ',
    };

    assert_eq!(grid.render_with(custom), " @   \n  @  \n@@@  \n     \n");
}

#[test]
fn render_matches_display() {
    let grid = glider(GridConfig::default());

    assert_eq!(grid.render(), format!("{grid}"));
}

#[test]
fn glider_braille() {
    let grid = glider(GridConfig::default());

    assert_eq!(grid.render_braille(), "\u{282C}\u{2806}\u{2800}\n");
}

#[test]
fn custom_palette_reaches_pixels() {
    let palette = Palette {
        alive: Rgba::opaque(0, 128, 0),
        dead: Rgba::new(0, 0, 0, 0),
    };
    let grid = glider(GridConfig::default().with_palette(palette));

    assert_eq!(grid.pixel(0, 1), Ok([0, 128, 0, 255]));
    assert_eq!(grid.pixel(0, 0), Ok([0, 0, 0, 0]));

    // Fully transparent pixels take the background colour
    assert_eq!(Rgba::from_bytes([0, 0, 0, 0]).over(Rgba::WHITE), [255, 255, 255]);
}

#[test]
fn nearest_swatches_follow_palette() {
    let palette = Palette {
        alive: Rgba::opaque(255, 0, 0),
        dead: Rgba::new(0, 0, 0, 0),
    };
    let grid = glider(GridConfig::default().with_palette(palette));

    let swatches = [("R", [250, 10, 10]), ("W", [240, 240, 240]), ("K", [0, 0, 0])];

    // Transparent dead cells are matched as white
    insta::assert_snapshot!(grid.render_nearest(&swatches).unwrap(), @r"
    WRWWW
    WWRWW
    RRRWW
    WWWWW
    ");

    assert_eq!(grid.render_nearest(&[]), None);
}

#[test]
fn default_palette_as_hearts() {
    let grid = glider(GridConfig::default());

    let hearts = grid.render_nearest(HEARTS).unwrap();

    assert_eq!(hearts.lines().count(), 4);
    assert_eq!(hearts.matches('\u{1F5A4}').count(), 5);
    assert_eq!(hearts.matches('\u{1F90D}').count(), 15);
}
