// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaletteName {
    #[default]
    Blue,
    Green,
    Yellow,
    Orange,
    Pink,
    Purple,
    Cyan,
    Red,
}

impl PaletteName {
    pub const ALL: [PaletteName; 8] = [
        PaletteName::Blue,
        PaletteName::Green,
        PaletteName::Yellow,
        PaletteName::Orange,
        PaletteName::Pink,
        PaletteName::Purple,
        PaletteName::Cyan,
        PaletteName::Red,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaletteName::Blue => "blue",
            PaletteName::Green => "green",
            PaletteName::Yellow => "yellow",
            PaletteName::Orange => "orange",
            PaletteName::Pink => "pink",
            PaletteName::Purple => "purple",
            PaletteName::Cyan => "cyan",
            PaletteName::Red => "red",
        }
    }
}

impl std::fmt::Display for PaletteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
