use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Number of players; selects which map layout (data, hitbox, art) is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerCount(u8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerCountError {
    #[error("player count must be a positive number, got {0:?}")]
    Invalid(String),
}

impl PlayerCount {
    pub fn new(count: u8) -> Option<Self> {
        (count > 0).then_some(Self(count))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerCount {
    type Err = PlayerCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| PlayerCountError::Invalid(s.to_string()))
    }
}

/// Static asset tree of the map tool, rooted at `root`:
///
/// ```text
/// data/map/map{N}p.json
/// img/map/map{N}p/background.jpeg
/// img/map/map{N}p/hitbox.png
/// img/map/map{N}p/areas/{region}.png
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self, players: PlayerCount) -> PathBuf {
        self.root
            .join("data/map")
            .join(format!("map{}p.json", players))
    }

    fn image_dir(&self, players: PlayerCount) -> PathBuf {
        self.root.join("img/map").join(format!("map{}p", players))
    }

    pub fn background(&self, players: PlayerCount) -> PathBuf {
        self.image_dir(players).join("background.jpeg")
    }

    pub fn hitbox(&self, players: PlayerCount) -> PathBuf {
        self.image_dir(players).join("hitbox.png")
    }

    pub fn highlight(&self, players: PlayerCount, region: &str) -> PathBuf {
        self.image_dir(players)
            .join("areas")
            .join(format!("{}.png", region))
    }

    /// Player counts that have a data file installed, ascending.
    pub fn available_player_counts(&self) -> std::io::Result<Vec<PlayerCount>> {
        let dir = self.root.join("data/map");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut counts = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(count) = name
                .strip_prefix("map")
                .and_then(|rest| rest.strip_suffix("p.json"))
                .and_then(|n| n.parse::<PlayerCount>().ok())
            {
                counts.push(count);
            }
        }
        counts.sort();
        Ok(counts)
    }
}
