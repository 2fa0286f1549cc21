use serde::Deserialize;

/// Язык подписей панели (названия месяцев, метка "нет абонемента")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
    Ru,
}

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_RU: [&str; 12] = [
    "янв", "февр", "март", "апр", "май", "июнь", "июль", "авг", "сент", "окт", "нояб", "дек",
];

impl Locale {
    /// Короткое название месяца, `month` от 1 до 12
    pub fn short_month(&self, month: u32) -> &'static str {
        let table = match self {
            Locale::Es => &MONTHS_ES,
            Locale::En => &MONTHS_EN,
            Locale::Ru => &MONTHS_RU,
        };
        let idx = (month.clamp(1, 12) - 1) as usize;
        table[idx]
    }

    pub fn no_membership_label(&self) -> &'static str {
        match self {
            Locale::Es => "Sin membresía",
            Locale::En => "No membership",
            Locale::Ru => "Нет абонемента",
        }
    }
}
