use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub label: &'static str,
    pub description: &'static str,
}

impl KeyBinding {
    pub const fn new(
        key: KeyCode,
        modifiers: KeyModifiers,
        label: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            modifiers,
            label,
            description,
        }
    }

    /// Shift is ignored for characters; terminals disagree on reporting it
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        self.key == event.code && self.modifiers == modifiers
    }
}

/// Global key mappings; page keys are listed by each page
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Leave immediately
    pub force_quit: KeyBinding,
    /// Leave after confirmation
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub sign_in: KeyBinding,
    pub next_page: KeyBinding,
    pub previous_page: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            force_quit: KeyBinding::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                "Ctrl+C",
                "Hemen çık",
            ),
            quit: KeyBinding::new(KeyCode::Char('q'), KeyModifiers::NONE, "q", "Çıkış"),
            help: KeyBinding::new(KeyCode::Char('?'), KeyModifiers::NONE, "?", "Yardım"),
            sign_in: KeyBinding::new(
                KeyCode::Char('l'),
                KeyModifiers::CONTROL,
                "Ctrl+L",
                "Oturum aç",
            ),
            next_page: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE, "Tab", "Sonraki sayfa"),
            previous_page: KeyBinding::new(
                KeyCode::BackTab,
                KeyModifiers::SHIFT,
                "Shift+Tab",
                "Önceki sayfa",
            ),
        }
    }
}

impl KeyMap {
    fn bindings(&self) -> [&KeyBinding; 6] {
        [
            &self.next_page,
            &self.previous_page,
            &self.help,
            &self.sign_in,
            &self.quit,
            &self.force_quit,
        ]
    }

    /// Help text for the global bindings followed by `page_keys`
    pub fn help_text(&self, page_keys: &[(&str, &str)]) -> String {
        self.bindings()
            .into_iter()
            .map(|binding| (binding.label, binding.description))
            .chain(page_keys.iter().copied())
            .map(|(key, description)| format!("{:<10} {}", key, description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Short hint for the status bar
    pub fn status_hint(&self) -> String {
        format!(
            "{} {} | {} {} | {} {}",
            self.next_page.label,
            self.next_page.description,
            self.help.label,
            self.help.description,
            self.quit.label,
            self.quit.description
        )
    }
}
