use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// RGB triples for each role.
struct Palette {
  timestamp: (u8, u8, u8),
  primary: (u8, u8, u8),
  accent: (u8, u8, u8),
  info: (u8, u8, u8),
  success: (u8, u8, u8),
  label: (u8, u8, u8),
  value: (u8, u8, u8),
}

const DARK: Palette = Palette {
  timestamp: (118, 166, 166),
  primary: (191, 126, 4),
  accent: (166, 84, 55),
  info: (118, 166, 166),
  success: (118, 166, 166),
  label: (217, 164, 4),
  value: (242, 211, 56),
};

const LIGHT: Palette = Palette {
  timestamp: (92, 62, 38),
  primary: (70, 42, 25),
  accent: (211, 99, 70),
  info: (40, 111, 170),
  success: (34, 142, 90),
  label: (176, 103, 66),
  value: (199, 146, 76),
};

/// Terminal colours for log lines and tables; everything resets when disabled.
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  fn pick(&self, role: fn(&Palette) -> (u8, u8, u8)) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    let palette = match self.theme {
      Theme::Dark => &DARK,
      Theme::Light => &LIGHT,
    };
    let (r, g, b) = role(palette);
    Color::Rgb { r, g, b }
  }

  pub fn timestamp(&self) -> Color {
    self.pick(|palette| palette.timestamp)
  }

  pub fn primary(&self) -> Color {
    self.pick(|palette| palette.primary)
  }

  pub fn accent(&self) -> Color {
    self.pick(|palette| palette.accent)
  }

  pub fn info(&self) -> Color {
    self.pick(|palette| palette.info)
  }

  pub fn success(&self) -> Color {
    self.pick(|palette| palette.success)
  }

  pub fn label(&self) -> Color {
    self.pick(|palette| palette.label)
  }

  pub fn value(&self) -> Color {
    self.pick(|palette| palette.value)
  }
}

/// The same colour for `comfy-table` cells.
pub fn table_color(color: Color) -> ComfyColor {
  match color {
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    Color::AnsiValue(value) => ComfyColor::AnsiValue(value),
    Color::Black => ComfyColor::Black,
    Color::DarkGrey => ComfyColor::DarkGrey,
    Color::Red => ComfyColor::Red,
    Color::DarkRed => ComfyColor::DarkRed,
    Color::Green => ComfyColor::Green,
    Color::DarkGreen => ComfyColor::DarkGreen,
    Color::Yellow => ComfyColor::Yellow,
    Color::DarkYellow => ComfyColor::DarkYellow,
    Color::Blue => ComfyColor::Blue,
    Color::DarkBlue => ComfyColor::DarkBlue,
    Color::Magenta => ComfyColor::Magenta,
    Color::DarkMagenta => ComfyColor::DarkMagenta,
    Color::Cyan => ComfyColor::Cyan,
    Color::DarkCyan => ComfyColor::DarkCyan,
    Color::White => ComfyColor::White,
    Color::Grey => ComfyColor::Grey,
    Color::Reset => ComfyColor::Reset,
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

/// Reads `COLORFGBG` (background index 8 and above is light), else assumes dark.
fn detect_terminal_theme() -> Theme {
  if let Ok(colorfgbg) = std::env::var("COLORFGBG")
    && let Some(background) = colorfgbg.rsplit(';').next()
    && let Ok(index) = background.parse::<u8>()
  {
    return if index >= 8 { Theme::Light } else { Theme::Dark };
  }
  Theme::Dark
}
