use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub data: fn(&str) -> String,
    pub error: fn(&str) -> String,
    pub failure: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" | "" => Self::default_theme(),
            "plain" => Self::plain(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::default_theme()
            }
        }
    }

    fn default_theme() -> Self {
        Self {
            title: |s| s.bright_magenta().bold().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            data: |s| s.white().to_string(),
            error: |s| s.yellow().to_string(),
            failure: |s| s.red().bold().to_string(),
        }
    }

    fn plain() -> Self {
        Self {
            title: |s| s.to_string(),
            line: |s| s.to_string(),
            idx: |s| s.to_string(),
            data: |s| s.to_string(),
            error: |s| s.to_string(),
            failure: |s| s.to_string(),
        }
    }
}
