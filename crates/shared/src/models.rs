use serde::{Deserialize, Serialize};

/// Opaque RGB colour used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0xff, 0x00);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    pub const GRAY: Rgb = Rgb::new(0x88, 0x88, 0x88);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// CSS hex notation, e.g. `#ff0000`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerColor {
    #[serde(rename = "Rojo")]
    Red,
    #[serde(rename = "Verde")]
    Green,
    #[default]
    #[serde(rename = "Azul")]
    Blue,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 3] = [PlayerColor::Red, PlayerColor::Green, PlayerColor::Blue];

    /// Parse a stored preference value. Unknown values yield `None`.
    pub fn from_pref(value: &str) -> Option<Self> {
        match value {
            "Rojo" => Some(PlayerColor::Red),
            "Verde" => Some(PlayerColor::Green),
            "Azul" => Some(PlayerColor::Blue),
            _ => None,
        }
    }

    /// The string written to the preference bag, also the radio option label.
    pub fn pref_value(self) -> &'static str {
        match self {
            PlayerColor::Red => "Rojo",
            PlayerColor::Green => "Verde",
            PlayerColor::Blue => "Azul",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            PlayerColor::Red => Rgb::RED,
            PlayerColor::Green => Rgb::GREEN,
            PlayerColor::Blue => Rgb::BLUE,
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pref_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerShape {
    #[default]
    #[serde(rename = "Cuadrado")]
    Square,
    #[serde(rename = "Triángulo")]
    Triangle,
    #[serde(rename = "Círculo")]
    Circle,
}

impl PlayerShape {
    pub const ALL: [PlayerShape; 3] = [PlayerShape::Square, PlayerShape::Triangle, PlayerShape::Circle];

    /// Parse a stored preference value. Unknown values yield `None`.
    pub fn from_pref(value: &str) -> Option<Self> {
        match value {
            "Cuadrado" => Some(PlayerShape::Square),
            "Triángulo" => Some(PlayerShape::Triangle),
            "Círculo" => Some(PlayerShape::Circle),
            _ => None,
        }
    }

    pub fn pref_value(self) -> &'static str {
        match self {
            PlayerShape::Square => "Cuadrado",
            PlayerShape::Triangle => "Triángulo",
            PlayerShape::Circle => "Círculo",
        }
    }
}

impl std::fmt::Display for PlayerShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pref_value())
    }
}

/// How the local player's marker is drawn. Serialises with the stored
/// preference strings, e.g. `{"color":"Rojo","shape":"Cuadrado"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerAppearance {
    pub color: PlayerColor,
    pub shape: PlayerShape,
}

impl PlayerAppearance {
    /// Resolve stored preference strings, falling back to blue / square.
    pub fn from_prefs(color: Option<&str>, shape: Option<&str>) -> Self {
        PlayerAppearance {
            color: color.and_then(PlayerColor::from_pref).unwrap_or_default(),
            shape: shape.and_then(PlayerShape::from_pref).unwrap_or_default(),
        }
    }
}

/// Grid-cell coordinates of a player. Not bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub col: i32,
    pub row: i32,
}

impl CellPosition {
    pub const fn new(col: i32, row: i32) -> Self {
        CellPosition { col, row }
    }
}

impl From<(i32, i32)> for CellPosition {
    fn from((col, row): (i32, i32)) -> Self {
        CellPosition { col, row }
    }
}

impl std::str::FromStr for CellPosition {
    type Err = String;

    /// Parse `"col,row"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (col, row) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `col,row`, got `{s}`"))?;
        let col = col.trim().parse::<i32>().map_err(|e| format!("bad column `{col}`: {e}"))?;
        let row = row.trim().parse::<i32>().map_err(|e| format!("bad row `{row}`: {e}"))?;
        Ok(CellPosition { col, row })
    }
}
