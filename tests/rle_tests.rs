use std::path::Path;

use pixel_life::config::GridConfig;
use pixel_life::grid::Grid;
use pixel_life::parse_rle;

#[test]
fn test_patterns() -> anyhow::Result<()> {
    let pattern_dir = std::fs::read_dir("tests/rle_pats")?;
    let mut tested = 0;
    let mut failed = Vec::new();

    for entry in pattern_dir {
        let path = entry?.path();
        let bytes = std::fs::read(&path)?;

        match parse_rle::read_rle(&bytes, |_x, _y| {}) {
            Ok(_) => tested += 1,
            Err(e) => failed.push((path.clone(), e)),
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("Failed to parse {:?}: {:#}", path, err);
        }

        panic!(
            "{}/{} patterns failed to parse",
            failed.len(),
            tested + failed.len()
        );
    }

    println!("Successfully parsed {} RLE patterns", tested);

    Ok(())
}

fn load(name: &str) -> anyhow::Result<Grid> {
    let bytes = std::fs::read(Path::new("tests/rle_pats").join(name))?;

    Ok(Grid::from_rle(&bytes, GridConfig::default())?)
}

#[test]
fn patterns_fill_their_header() -> anyhow::Result<()> {
    let cases = [
        ("glider.rle", (3, 3), 5),
        ("lwss.rle", (5, 4), 9),
        ("gosper_gun.rle", (36, 9), 36),
        ("pulsar.rle", (13, 13), 48),
        ("blinker_crlf.rle", (3, 1), 3),
        ("highlife_replicator.rle", (5, 5), 12),
    ];

    for (name, size, population) in cases {
        let grid = load(name)?;

        assert_eq!((grid.width(), grid.height()), size, "{name}");
        assert_eq!(grid.population(), population, "{name}");
    }

    Ok(())
}

#[test]
fn file_metadata() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/gosper_gun.rle")?;

    let file = parse_rle::read_rle(&bytes, |_, _| {})?;

    assert_eq!(file.name, Some(b"Gosper glider gun".as_slice()));
    assert_eq!(file.author, Some(b"Bill Gosper".as_slice()));
    assert_eq!(file.size, Some((36, 9)));
    assert_eq!(file.rule.map(|r| r.to_string()), Some("B3/S23".to_string()));

    Ok(())
}

#[test]
fn rule_comment_is_applied() -> anyhow::Result<()> {
    let grid = load("highlife_replicator.rle")?;

    assert_eq!(grid.config().rule.to_string(), "B36/S23");

    Ok(())
}

#[test]
fn pulsar_has_period_three() -> anyhow::Result<()> {
    let bytes = std::fs::read("tests/rle_pats/pulsar.rle")?;

    // Room around the pattern so it never touches the edge
    let mut grid = Grid::new(17, 17)?;
    grid.load_rle(&bytes, 2, 2)?;
    let start = grid.cells().to_vec();

    grid.step();
    assert_ne!(grid.cells(), start.as_slice());

    grid.step_n(2);
    assert_eq!(grid.cells(), start.as_slice());

    Ok(())
}
