use crate::{
    scenario::{AlbumTree, OVERFLOW_DIR, OVERFLOW_FILES, Scenario, TWENTY_K, TWO_K},
    traits::Commas,
};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::{
    fs::{copy, create_dir_all},
    ops::AddAssign,
    path::{Path, PathBuf},
};

/// What a run wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub files: usize,
    pub dirs: usize,
}

impl AddAssign for GenerationReport {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.dirs += other.dirs;
    }
}

/// Copies a template track into synthetic library layouts.
///
/// Nothing is cleaned up: existing directories are reused, same-named files
/// are overwritten and files from earlier runs stay where they are.
pub struct Generator {
    template: PathBuf,
    out_dir: PathBuf,
}

impl Generator {
    pub fn new(template: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Writing ID3 tags is not supported, every track stays a plain copy of
    /// the template.
    pub fn with_tags(self, tags: bool) -> Self {
        if tags {
            warn!("Writing MP3 tags is not implemented, copying the template as is");
        }

        self
    }

    pub fn run(&self, scenario: Scenario) -> Result<GenerationReport> {
        match scenario {
            Scenario::TwoK => self.album_tree(TWO_K),
            Scenario::TwentyK => self.album_tree(TWENTY_K),
            Scenario::OverflowDirectory => self.overflow_directory(),
            Scenario::Mixed => {
                let mut report = self.album_tree(TWO_K)?;
                report += self.overflow_directory()?;
                Ok(report)
            }
        }
    }

    /// `ARTIST_<n>/ALBUM_<m>/TRACK_<t>_FOR_ART_<n>_IN_ALB_<m>.mp3`
    pub fn album_tree(&self, tree: AlbumTree) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        for artist in 0..tree.artists {
            for album in 0..tree.albums {
                let album_dir = self
                    .out_dir
                    .join(format!("ARTIST_{artist}"))
                    .join(format!("ALBUM_{album}"));
                Self::ensure_dir(&album_dir)?;

                for track in 0..tree.tracks {
                    let name = format!("TRACK_{track}_FOR_ART_{artist}_IN_ALB_{album}.mp3");
                    self.copy_template(&album_dir.join(name))?;
                }

                report.files += tree.tracks;
                report.dirs += 1;
                debug!("Created album: {}", album_dir.display());
            }
        }

        Ok(report)
    }

    /// A flat `tooManyFiles/TRACK_<t>.mp3` directory with more entries than
    /// the downstream library handles.
    pub fn overflow_directory(&self) -> Result<GenerationReport> {
        let dir = self.out_dir.join(OVERFLOW_DIR);
        Self::ensure_dir(&dir)?;

        for track in 0..OVERFLOW_FILES {
            self.copy_template(&dir.join(format!("TRACK_{track}.mp3")))?;
        }

        debug!(
            "Created directory with {} files at: {}",
            OVERFLOW_FILES.commas(),
            dir.display()
        );

        Ok(GenerationReport {
            files: OVERFLOW_FILES,
            dirs: 1,
        })
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            create_dir_all(dir).with_context(|| format!("Could not create {}", dir.display()))?;
        }

        Ok(())
    }

    fn copy_template(&self, target: &Path) -> Result<()> {
        copy(&self.template, target).with_context(|| {
            format!(
                "Could not copy {} to {}",
                self.template.display(),
                target.display()
            )
        })?;

        Ok(())
    }
}

/// Runs a scenario by name; unknown names write nothing.
pub fn generate(generator: &Generator, scenario: &str) -> Result<GenerationReport> {
    let report = match Scenario::from_name(scenario) {
        Some(scenario) => {
            debug!(
                "Generating scenario {} ({} files)",
                scenario.name(),
                scenario.files().commas()
            );
            generator.run(scenario)?
        }
        None => GenerationReport::default(),
    };

    if report.files > 0 {
        info!(
            "Wrote {} files into {} directories",
            report.files.commas(),
            report.dirs.commas()
        );
    }

    info!("DONE");

    Ok(report)
}
