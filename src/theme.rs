use ratatui::style::Color;

/// Colour palette for the form.
#[derive(Debug)]
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub success: Color,
  pub error: Color,
  pub status: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  pub highlight_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 247, 240),
    fg: Color::Rgb(40, 38, 34),
    accent: Color::Rgb(196, 52, 44),
    muted: Color::Rgb(140, 134, 124),
    border: Color::Rgb(200, 194, 182),
    success: Color::Rgb(46, 125, 50),
    error: Color::Rgb(198, 40, 40),
    status: Color::Rgb(94, 53, 177),
    key_fg: Color::Rgb(250, 247, 240),
    key_bg: Color::Rgb(120, 114, 104),
    highlight_bg: Color::Rgb(236, 229, 214),
  },
  Theme {
    name: "Dusk",
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    accent: Color::Rgb(243, 139, 168),
    muted: Color::Rgb(127, 132, 156),
    border: Color::Rgb(69, 71, 90),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    status: Color::Rgb(137, 180, 250),
    key_fg: Color::Rgb(30, 30, 46),
    key_bg: Color::Rgb(180, 190, 254),
    highlight_bg: Color::Rgb(49, 50, 68),
  },
  Theme {
    name: "Terminal",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::Red,
    muted: Color::DarkGray,
    border: Color::Gray,
    success: Color::Green,
    error: Color::LightRed,
    status: Color::Cyan,
    key_fg: Color::Black,
    key_bg: Color::Gray,
    highlight_bg: Color::DarkGray,
  },
];

/// Index of the theme called `name`, falling back to the first.
pub fn theme_index(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name == n)).unwrap_or(0)
}
