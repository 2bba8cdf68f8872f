//! CLI Command Implementations

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::audio;
use crate::detect::{BridgeDetector, CancelToken, EnergyDetector, PauseDetector};
use crate::editor::EditorSession;
use crate::error::{PausecutError, Result};
use crate::state::{ProjectRecord, ProjectStore};

/// Pick a detector: `--local` forces the energy scan, otherwise the bridge
/// is used when configured, falling back to the energy scan.
fn select_detector(local: bool) -> Box<dyn PauseDetector> {
    if local {
        return Box::new(EnergyDetector::new());
    }
    if BridgeDetector::is_configured() {
        Box::new(BridgeDetector::new())
    } else {
        info!("no detection bridge configured, using local energy detector");
        Box::new(EnergyDetector::new())
    }
}

fn open_session(input: &Path, min_pause: f64) -> Result<EditorSession> {
    let media = fs::read(input)?;
    let mime = audio::guess_mime(input);
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    EditorSession::open(media, &name, &mime, min_pause)
}

/// Detect pauses and print them as JSON.
pub fn detect(input: &Path, min_pause: f64, local: bool) -> Result<()> {
    let mut session = open_session(input, min_pause)?;
    let detector = select_detector(local);
    let count = session.detect_pauses(detector.as_ref(), &CancelToken::new())?;

    info!("{} detected {} pause(s)", detector.name(), count);
    println!("{}", serde_json::to_string_pretty(session.pauses())?);
    Ok(())
}

/// Full pipeline: detect, toggle kept pauses, splice, encode, save project.
#[allow(clippy::too_many_arguments)]
pub fn split(
    input: &Path,
    output: Option<&Path>,
    min_pause: f64,
    keep: &[usize],
    local: bool,
    store_dir: &Path,
    no_save: bool,
) -> Result<()> {
    let mut session = open_session(input, min_pause)?;
    let detector = select_detector(local);
    let count = session.detect_pauses(detector.as_ref(), &CancelToken::new())?;
    println!("Detected {} pause(s) >= {:.1}s", count, session.min_pause_secs());

    for &index in keep {
        let target = index
            .checked_sub(1)
            .and_then(|i| session.pauses().get(i))
            .map(|p| (p.id, p.start, p.end));
        match target {
            Some((id, start, end)) => {
                session.toggle(id);
                println!("Keeping pause {} ({:.2}s - {:.2}s)", index, start, end);
            }
            None => warn!("--keep index {} is out of range, ignoring", index),
        }
    }

    let (bytes, suggested_name) = session.export_wav()?;
    let out_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_file_name(&suggested_name),
    };
    fs::write(&out_path, &bytes)?;
    println!("Wrote {} ({} bytes)", out_path.display(), bytes.len());

    if !no_save {
        let store = ProjectStore::open(store_dir)?;
        let record = ProjectRecord::new(session.to_project_data());
        store.save(&record)?;
        println!("Saved project {}", record.id);
    }

    Ok(())
}

/// Render the waveform with removal bands to a PNG.
pub fn waveform(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
    zoom: f32,
    min_pause: f64,
    local: bool,
) -> Result<()> {
    let mut session = open_session(input, min_pause)?;
    let detector = select_detector(local);

    // A failed detection still leaves a renderable (band-free) waveform.
    match session.detect_pauses(detector.as_ref(), &CancelToken::new()) {
        Ok(count) => info!("overlaying {} pause band(s)", count),
        Err(e) => warn!("detection failed, rendering without bands: {}", e),
    }

    session.set_zoom(zoom);
    let image = session.waveform(width, height);
    image.save(output).map_err(|e| PausecutError::ExportFailed {
        reason: format!("failed to write PNG: {}", e),
    })?;

    println!("Wrote {} ({}x{})", output.display(), image.width(), image.height());
    Ok(())
}

/// List saved project records.
pub fn projects_list(store_dir: &Path) -> Result<()> {
    let store = ProjectStore::open(store_dir)?;
    let records = store.list()?;

    if records.is_empty() {
        println!("No projects in {}", store_dir.display());
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}  (updated {})",
            record.id,
            record.title,
            record.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// Print one project record as JSON.
pub fn projects_show(id: &str, store_dir: &Path) -> Result<()> {
    let store = ProjectStore::open(store_dir)?;
    let record = store.load(id)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Delete a project record.
pub fn projects_delete(id: &str, store_dir: &Path) -> Result<()> {
    let store = ProjectStore::open(store_dir)?;
    store.delete(id)?;
    println!("Deleted {}", id);
    Ok(())
}
