/// Artists × albums × tracks of a bulk scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlbumTree {
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}

impl AlbumTree {
    pub const fn files(&self) -> usize {
        self.artists * self.albums * self.tracks
    }

    pub const fn album_dirs(&self) -> usize {
        self.artists * self.albums
    }
}

pub const TWO_K: AlbumTree = AlbumTree {
    artists: 10,
    albums: 10,
    tracks: 20,
};

pub const TWENTY_K: AlbumTree = AlbumTree {
    artists: 130,
    albums: 10,
    tracks: 20,
};

/// The downstream filesystem library cannot list more than 128 entries in a
/// single directory.
pub const OVERFLOW_FILES: usize = 140;
pub const OVERFLOW_DIR: &str = "tooManyFiles";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    TwoK,
    TwentyK,
    OverflowDirectory,
    Mixed,
}

impl Scenario {
    /// Case-sensitive lookup of a scenario name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "2k" => Some(Self::TwoK),
            "20k" => Some(Self::TwentyK),
            "dir128" => Some(Self::OverflowDirectory),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TwoK => "2k",
            Self::TwentyK => "20k",
            Self::OverflowDirectory => "dir128",
            Self::Mixed => "mixed",
        }
    }

    /// Total number of files the scenario writes.
    pub fn files(&self) -> usize {
        match self {
            Self::TwoK => TWO_K.files(),
            Self::TwentyK => TWENTY_K.files(),
            Self::OverflowDirectory => OVERFLOW_FILES,
            Self::Mixed => TWO_K.files() + OVERFLOW_FILES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(Scenario::from_name("2k"), Some(Scenario::TwoK));
        assert_eq!(Scenario::from_name("20k"), Some(Scenario::TwentyK));
        assert_eq!(Scenario::from_name("dir128"), Some(Scenario::OverflowDirectory));
        assert_eq!(Scenario::from_name("mixed"), Some(Scenario::Mixed));
        assert_eq!(Scenario::from_name("2K"), None);
        assert_eq!(Scenario::from_name("root128"), None);
    }

    #[test]
    fn names_round_trip() {
        for scenario in [
            Scenario::TwoK,
            Scenario::TwentyK,
            Scenario::OverflowDirectory,
            Scenario::Mixed,
        ] {
            assert_eq!(Scenario::from_name(scenario.name()), Some(scenario));
        }
    }

    #[test]
    fn documented_sizes() {
        assert_eq!(Scenario::TwoK.files(), 2_000);
        assert_eq!(TWO_K.album_dirs(), 100);
        assert_eq!(Scenario::TwentyK.files(), 26_000);
        assert_eq!(TWENTY_K.album_dirs(), 1_300);
        assert_eq!(Scenario::OverflowDirectory.files(), 140);
        assert_eq!(Scenario::Mixed.files(), 2_140);
    }
}
