//! Operator-facing message language.

/// Language used for messages shown to the operator.
///
/// # Examples
///
/// ```
/// use devtools::locale::Locale;
///
/// assert_eq!(Locale::from_lang_tag("pt_BR.UTF-8"), Locale::PtBr);
/// assert_eq!(Locale::from_lang_tag("en_US.UTF-8"), Locale::En);
/// assert_eq!(Locale::from_lang_tag(""), Locale::En);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Brazilian Portuguese.
    #[value(name = "pt-br")]
    PtBr,
}

impl Locale {
    /// Pick a locale from a POSIX-style language tag (`pt_BR.UTF-8`, `en`, ...).
    ///
    /// Any Portuguese tag maps to [`Locale::PtBr`]; everything else to
    /// [`Locale::En`].
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Self {
        let lang = tag.trim().get(..2).unwrap_or_default();
        if lang.eq_ignore_ascii_case("pt") {
            Self::PtBr
        } else {
            Self::En
        }
    }

    /// Resolve the locale from `DEVTOOLS_LANG`, falling back to `LANG`.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("DEVTOOLS_LANG")
            .or_else(|_| std::env::var("LANG"))
            .map_or(Self::En, |tag| Self::from_lang_tag(&tag))
    }

    /// The two-line notice shown when a backup directory may not be created.
    #[must_use]
    pub const fn directory_not_authorized(self) -> [&'static str; 2] {
        match self {
            Self::En => [
                "The given path does not exist. Creating the directory was not authorized.",
                "Adjust the program's permissions or create the destination folder manually.",
            ],
            Self::PtBr => [
                "Caminho informado não existe. Criação de diretório não foi autorizado.",
                "Ajuste a permissão do algoritmo ou crie manualmente a pasta de destino.",
            ],
        }
    }
}
