use serde::{Deserialize, Serialize};

/// Output language for every generated heading and sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "pt-br", alias = "pt-BR", alias = "pt")]
    BrazilianPortuguese,
}

/// Resume body sections, in the only order the generator may emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Education,
}

impl Section {
    pub const ORDERED: [Section; 4] = [
        Section::Summary,
        Section::Skills,
        Section::Experience,
        Section::Education,
    ];
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::BrazilianPortuguese => "pt-br",
        }
    }

    /// Name used inside prompts ("write everything in {name}").
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::BrazilianPortuguese => "Brazilian Portuguese (pt-BR)",
        }
    }

    pub fn heading(self, section: Section) -> &'static str {
        match (self, section) {
            (Language::English, Section::Summary) => "Summary",
            (Language::English, Section::Skills) => "Skills",
            (Language::English, Section::Experience) => "Experience",
            (Language::English, Section::Education) => "Education",
            (Language::BrazilianPortuguese, Section::Summary) => "Resumo",
            (Language::BrazilianPortuguese, Section::Skills) => "Competências",
            (Language::BrazilianPortuguese, Section::Experience) => "Experiência",
            (Language::BrazilianPortuguese, Section::Education) => "Formação Acadêmica",
        }
    }

    /// Localized headings in canonical order.
    pub fn headings(self) -> Vec<&'static str> {
        Section::ORDERED.iter().map(|s| self.heading(*s)).collect()
    }
}
