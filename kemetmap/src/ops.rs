use crate::highlight::{self, HighlightPlan};
use crate::info::{InfoPanel, RegionInfo};
use crate::loader;
use crate::session::{ClickOutcome, PickerSession};
use kemetdata::{AssetLayout, DisplayPoint, DisplaySize, HitboxColor, PlayerCount, RegionCatalog};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Normalize path for display - convert to forward slashes for cleaner logging
fn display_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Selects `players` and waits for both loads. Any load failure is an error here.
pub fn open_session(layout: &AssetLayout, players: PlayerCount) -> Result<PickerSession, String> {
    let mut session = PickerSession::new(layout.clone(), players);
    let request = session.select(players);
    for event in loader::load_blocking(layout, request) {
        if let Some(e) = event.error() {
            return Err(e);
        }
        session.apply(event);
    }
    Ok(session)
}

/// Click position plus the displayed size; a missing dimension means the map
/// is shown at native size.
pub fn display_click(
    session: &PickerSession,
    x: f64,
    y: f64,
    width: Option<f64>,
    height: Option<f64>,
) -> (DisplayPoint, DisplaySize) {
    let (native_w, native_h) = session.native_size().unwrap_or((0, 0));
    let size = DisplaySize::new(
        width.unwrap_or(native_w as f64),
        height.unwrap_or(native_h as f64),
    );
    (DisplayPoint::new(x, y), size)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum PickReport {
    Ignored,
    Empty,
    Unknown {
        color: HitboxColor,
    },
    Selected {
        region: RegionInfo,
        highlights: HighlightPlan,
    },
}

impl PickReport {
    pub fn from_session(outcome: &ClickOutcome, session: &PickerSession) -> Self {
        match (outcome, session.panel()) {
            (ClickOutcome::Selected(_), InfoPanel::Region(info)) => PickReport::Selected {
                region: info.clone(),
                highlights: session.highlights().clone(),
            },
            (ClickOutcome::Unknown(color), _) => PickReport::Unknown { color: *color },
            (ClickOutcome::Empty, _) => PickReport::Empty,
            _ => PickReport::Ignored,
        }
    }
}

pub fn pick(
    layout: &AssetLayout,
    players: PlayerCount,
    (x, y): (f64, f64),
    width: Option<f64>,
    height: Option<f64>,
    json: bool,
) -> Result<ClickOutcome, String> {
    let mut session = open_session(layout, players)?;
    let (point, size) = display_click(&session, x, y, width, height);
    let outcome = session.click(point, size);

    if json {
        let report = PickReport::from_session(&outcome, &session);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?
        );
    } else {
        println!("{}", outcome_text(&outcome, &session, (x, y)));
    }
    Ok(outcome)
}

/// What the one-shot commands print for a click.
fn outcome_text(outcome: &ClickOutcome, session: &PickerSession, (x, y): (f64, f64)) -> String {
    match outcome {
        ClickOutcome::Ignored => format!("Click ({}, {}) is outside the map", x, y),
        _ => session.panel().to_string(),
    }
}

pub fn render(
    layout: &AssetLayout,
    players: PlayerCount,
    (x, y): (f64, f64),
    width: Option<f64>,
    height: Option<f64>,
    output: &Path,
) -> Result<ClickOutcome, String> {
    let mut session = open_session(layout, players)?;
    let (point, size) = display_click(&session, x, y, width, height);
    let outcome = session.click(point, size);
    println!("{}", outcome_text(&outcome, &session, (x, y)));

    let background_path = session.background();
    log::info!("Loading background from {}", display_path(background_path));
    let background = image::open(background_path)
        .map_err(|e| format!("{}: {}", display_path(background_path), e))?
        .to_rgba8();

    let out = highlight::compose(&background, session.highlights());
    out.save(output).map_err(|e| e.to_string())?;
    println!("Saved {}", display_path(output));
    Ok(outcome)
}

pub struct ValidationReport {
    pub regions: usize,
    /// Catalog problems, already formatted.
    pub issues: Vec<String>,
    /// Problems that break the one-color-one-region mapping.
    pub fatal: usize,
}

/// Checks the catalog on its own and against the hitbox colors actually painted.
pub fn validate(layout: &AssetLayout, players: PlayerCount) -> Result<ValidationReport, String> {
    let session = open_session(layout, players)?;
    let (Some(catalog), Some(hitbox)) = (session.catalog(), session.hitbox()) else {
        return Err("map data not loaded".to_string());
    };

    let mut issues = Vec::new();
    let mut fatal = 0;
    for issue in catalog.validate() {
        if issue.breaks_color_mapping() {
            fatal += 1;
        }
        issues.push(issue.to_string());
    }

    let census = hitbox.color_census();
    let mut unmapped: Vec<(HitboxColor, u64)> = census
        .iter()
        .filter(|(color, _)| catalog.find_by_color(&color.to_hex()).is_none())
        .map(|(color, count)| (*color, *count))
        .collect();
    unmapped.sort_by_key(|(color, _)| color.to_hex());
    for (color, count) in unmapped {
        issues.push(format!(
            "hitbox color {} ({} px) has no region",
            color, count
        ));
    }

    for id in unpainted_regions(catalog, &census.keys().copied().collect()) {
        issues.push(format!("region {} does not appear in the hitbox image", id));
    }

    Ok(ValidationReport {
        regions: catalog.len(),
        issues,
        fatal,
    })
}

fn unpainted_regions<'a>(catalog: &'a RegionCatalog, painted: &HashSet<HitboxColor>) -> Vec<&'a str> {
    catalog
        .iter()
        .filter(|(_, region)| region.color().is_ok_and(|c| !painted.contains(&c)))
        .map(|(id, _)| id.as_str())
        .collect()
}

pub fn counts(layout: &AssetLayout) -> Result<Vec<PlayerCount>, String> {
    layout
        .available_player_counts()
        .map_err(|e| format!("{}: {}", display_path(layout.root()), e))
}
