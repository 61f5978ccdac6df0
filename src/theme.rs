use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub background: Color,
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
    pub highlight: Color,
    pub container: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::light()
    }
}

impl ThemeColors {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(245, 247, 250),      // #f5f7fa
            primary: Color::Rgb(30, 99, 214),           // #1e63d6
            secondary: Color::Rgb(108, 117, 125),       // #6c757d
            text: Color::Rgb(33, 37, 41),               // #212529
            text_secondary: Color::Rgb(134, 142, 150),  // #868e96
            accent: Color::Rgb(40, 167, 69),            // #28a745
            success: Color::Rgb(40, 167, 69),           // #28a745
            warning: Color::Rgb(255, 159, 28),          // #ff9f1c
            error: Color::Rgb(220, 53, 69),             // #dc3545
            border: Color::Rgb(206, 212, 218),          // #ced4da
            highlight: Color::Rgb(30, 99, 214),         // #1e63d6
            container: Color::Rgb(233, 236, 239),       // #e9ecef
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 20, 24),         // #121418
            primary: Color::Rgb(88, 148, 255),          // #5894ff
            secondary: Color::Rgb(52, 58, 64),          // #343a40
            text: Color::Rgb(236, 239, 241),            // #eceff1
            text_secondary: Color::Rgb(144, 152, 160),  // #9098a0
            accent: Color::Rgb(72, 199, 116),           // #48c774
            success: Color::Rgb(72, 199, 116),          // #48c774
            warning: Color::Rgb(255, 196, 0),           // #ffc400
            error: Color::Rgb(255, 99, 99),             // #ff6363
            border: Color::Rgb(73, 80, 87),             // #495057
            highlight: Color::Rgb(88, 148, 255),        // #5894ff
            container: Color::Rgb(33, 37, 41),          // #212529
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            background: Color::Black,
            primary: Color::Yellow,
            secondary: Color::Gray,
            text: Color::White,
            text_secondary: Color::Gray,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border: Color::White,
            highlight: Color::Yellow,
            container: Color::Black,
        }
    }

    pub fn from_name(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "high contrast" => Self::high_contrast(),
            _ => {
                log::warn!("Unknown theme '{}', falling back to light", theme_name);
                Self::light()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: ThemeColors,
    theme_name: String,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self {
            current_theme: ThemeColors::default(),
            theme_name: "Light".to_string(),
        }
    }
}

impl ThemeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(theme_name: &str) -> Self {
        let mut manager = Self::new();
        manager.set_theme(theme_name);
        manager
    }

    pub fn set_theme(&mut self, theme_name: &str) {
        self.theme_name = theme_name.to_string();
        self.current_theme = ThemeColors::from_name(theme_name);
        log::info!("Theme set to: {}", theme_name);
    }

    pub fn get_colors(&self) -> &ThemeColors {
        &self.current_theme
    }

    pub fn get_theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["Light", "Dark", "High Contrast"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in ThemeManager::available_themes() {
            let manager = ThemeManager::named(name);
            assert_eq!(manager.get_theme_name(), name);
        }
        assert_eq!(ThemeColors::from_name("DARK").background, ThemeColors::dark().background);
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let colors = ThemeColors::from_name("Hot Dog Stand");
        assert_eq!(colors.primary, ThemeColors::light().primary);
    }
}
