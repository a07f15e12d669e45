//! Fixed locale tables (pt-BR) for wheel labels.

/// Three-letter month labels shown on the month wheel.
pub const MONTH_INITIALS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Full month names for surfaces that prefer long labels.
pub const MONTH_FULL_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Day-of-week column headers for the day grid, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["DOM", "SEG", "TER", "QUA", "QUI", "SEX", "SÁB"];

/// Short label for a 1-based month number.
pub fn month_initial(month: u32) -> Option<&'static str> {
    MONTH_INITIALS.get(month.checked_sub(1)? as usize).copied()
}

/// Full name for a 1-based month number.
pub fn month_full_name(month: u32) -> Option<&'static str> {
    MONTH_FULL_NAMES.get(month.checked_sub(1)? as usize).copied()
}
