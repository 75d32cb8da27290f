use std::io::IsTerminal;

use clap::{ValueEnum, builder::styling::Ansi256Color};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

use crate::generator::orchestrator::GenerationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

/// What a piece of terminal output is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Timestamp,
  Primary,
  Accent,
  Info,
  Success,
  Warning,
  Failure,
  Label,
  Value,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb { r, g, b }
}

impl Role {
  const fn color(self, theme: Theme) -> Color {
    match (self, theme) {
      (Self::Timestamp | Self::Info | Self::Success, Theme::Dark) => rgb(118, 166, 166),
      (Self::Timestamp, Theme::Light) => rgb(92, 62, 38),
      (Self::Primary, Theme::Dark) => rgb(191, 126, 4),
      (Self::Primary, Theme::Light) => rgb(70, 42, 25),
      (Self::Accent, Theme::Dark) => rgb(166, 84, 55),
      (Self::Accent, Theme::Light) => rgb(211, 99, 70),
      (Self::Info, Theme::Light) => rgb(40, 111, 170),
      (Self::Success, Theme::Light) => rgb(34, 142, 90),
      (Self::Warning, Theme::Dark) => rgb(230, 180, 60),
      (Self::Warning, Theme::Light) => rgb(168, 112, 0),
      (Self::Failure, Theme::Dark) => rgb(224, 90, 80),
      (Self::Failure, Theme::Light) => rgb(178, 34, 34),
      (Self::Label, Theme::Dark) => rgb(217, 164, 4),
      (Self::Label, Theme::Light) => rgb(176, 103, 66),
      (Self::Value, Theme::Dark) => rgb(242, 211, 56),
      (Self::Value, Theme::Light) => rgb(199, 146, 76),
    }
  }
}

/// Terminal palette; every color is `Reset` when colors are disabled.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

pub trait IntoComfyColor {
  fn into(self) -> ComfyColor;
}

impl IntoComfyColor for Color {
  fn into(self) -> ComfyColor {
    match self {
      Color::Reset => ComfyColor::Reset,
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
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(val) => ComfyColor::AnsiValue(val),
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn role(&self, role: Role) -> Color {
    if self.enabled {
      role.color(self.theme)
    } else {
      Color::Reset
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.role(Role::Timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.role(Role::Primary)
  }

  pub const fn accent(&self) -> Color {
    self.role(Role::Accent)
  }

  pub const fn info(&self) -> Color {
    self.role(Role::Info)
  }

  pub const fn success(&self) -> Color {
    self.role(Role::Success)
  }

  pub const fn warning(&self) -> Color {
    self.role(Role::Warning)
  }

  pub const fn failure(&self) -> Color {
    self.role(Role::Failure)
  }

  pub const fn label(&self) -> Color {
    self.role(Role::Label)
  }

  pub const fn value(&self) -> Color {
    self.role(Role::Value)
  }

  /// Color of the final status line of a run.
  pub const fn status(&self, status: GenerationStatus) -> Color {
    match status {
      GenerationStatus::Success => self.success(),
      GenerationStatus::PartialFailure | GenerationStatus::Cancelled => self.warning(),
      GenerationStatus::Failed => self.failure(),
    }
  }

  const fn to_clap(color: Color) -> Option<clap::builder::styling::Color> {
    use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor};

    match color {
      Color::Black => Some(ClapColor::Ansi(AnsiColor::Black)),
      Color::Blue | Color::DarkBlue => Some(ClapColor::Ansi(AnsiColor::Blue)),
      Color::Cyan | Color::DarkCyan => Some(ClapColor::Ansi(AnsiColor::Cyan)),
      Color::DarkGreen | Color::Green => Some(ClapColor::Ansi(AnsiColor::Green)),
      Color::DarkGrey | Color::Grey => Some(ClapColor::Ansi(AnsiColor::BrightBlack)),
      Color::DarkMagenta | Color::Magenta => Some(ClapColor::Ansi(AnsiColor::Magenta)),
      Color::DarkRed | Color::Red => Some(ClapColor::Ansi(AnsiColor::Red)),
      Color::DarkYellow | Color::Yellow => Some(ClapColor::Ansi(AnsiColor::Yellow)),
      Color::White => Some(ClapColor::Ansi(AnsiColor::White)),
      Color::AnsiValue(val) => Some(ClapColor::Ansi256(Ansi256Color(val))),
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::Reset => None,
    }
  }

  /// Help and error styling for clap, always in the dark palette.
  pub const fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{Style, Styles};

    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(Self::to_clap(colors.label())))
      .literal(Style::new().fg_color(Self::to_clap(colors.success())))
      .placeholder(Style::new().fg_color(Self::to_clap(colors.info())))
      .error(Style::new().bold().fg_color(Self::to_clap(colors.failure())))
      .valid(Style::new().fg_color(Self::to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
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

fn detect_terminal_theme() -> Theme {
  std::env::var("COLORFGBG")
    .ok()
    .and_then(|value| theme_from_colorfgbg(&value))
    .unwrap_or(Theme::Dark)
}

/// Reads the background slot of `COLORFGBG` (`fg;bg` or `fg;default;bg`).
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
  let background = value.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
