use hurford::{AmbiguityPolicy, DerivationVerbose, MechanismSet, Resolution};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_derivation(out: &DerivationVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let derivation = &out.derivation;
    let details = &out.details;

    println!(
        "\n{}",
        palette.bold(palette.paint(
            format!(
                "⚙  Deriving: \"{}\" over {}..={}",
                derivation.language, derivation.domain.first, derivation.domain.last
            ),
            ansi::CYAN
        ))
    );
    println!("  {} {}", palette.dim("mechanisms:"), palette.paint(mechanism_names(details.mechanisms), ansi::BLUE));

    println!("\n{}", palette.paint("━━━ Passes ━━━", ansi::GRAY));
    for (label, pass) in [
        ("Seed:", &details.metrics.seed),
        ("Phrase pass:", &details.metrics.phrase_pass),
        ("Combine pass:", &details.metrics.combine_pass),
    ] {
        println!(
            "  {} {}  {}",
            palette.paint(format!("{label:<13}"), ansi::BLUE),
            if pass.produced > 0 {
                palette.paint(format!("✓ {} candidates", pass.produced), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {} candidates", pass.produced))
            },
            palette.dim(format!("{:?}", pass.duration)),
        );
    }

    println!("\n{}", palette.paint("━━━ Outcomes ━━━", ansi::GRAY));
    let unique = derivation.forms.iter().filter(|form| form.resolution.is_unique()).count();
    println!(
        "  {} unique  │  {} ambiguous  │  {} unconstructable",
        palette.paint(unique.to_string(), ansi::GREEN),
        palette.paint(details.ambiguous.len().to_string(), ansi::YELLOW),
        palette.paint(details.unconstructable.len().to_string(), ansi::YELLOW),
    );

    for (number, candidates) in details.ambiguous.iter().take(8) {
        println!(
            "  {} {}",
            palette.paint(format!("ambiguous {number}:"), ansi::YELLOW),
            palette.dim(candidates.join("  |  "))
        );
    }
    if details.ambiguous.len() > 8 {
        println!("  {}", palette.dim(format!("... +{} more", details.ambiguous.len() - 8)));
    }
    if !details.unconstructable.is_empty() {
        let shown: Vec<String> = details.unconstructable.iter().take(20).map(i64::to_string).collect();
        let suffix = if details.unconstructable.len() > 20 { ", ..." } else { "" };
        println!("  {} {}{}", palette.paint("unconstructable:", ansi::YELLOW), shown.join(", "), suffix);
    }

    println!("\n{}", palette.paint("━━━ Sample ━━━", ansi::GRAY));
    for form in derivation.forms.iter().take(12) {
        let surface = form.resolution.surface(AmbiguityPolicy::MarkUnresolved);
        let painted = match form.resolution {
            Resolution::Unique(_) => palette.paint(surface, ansi::GREEN),
            _ => palette.paint(surface, ansi::YELLOW),
        };
        println!("  {} {}", palette.dim(format!("{:>3}", form.number)), painted);
    }
    if derivation.forms.len() > 12 {
        println!("  {}", palette.dim(format!("... +{} more", derivation.forms.len() - 12)));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Passes: {}  │  Canonicalize: {}",
        palette.paint(format!("{:?}", details.metrics.total), ansi::GREEN),
        palette.paint(
            format!(
                "{:?}",
                details.metrics.seed.duration
                    + details.metrics.phrase_pass.duration
                    + details.metrics.combine_pass.duration
            ),
            ansi::CYAN
        ),
        palette.dim(format!("{:?}", details.metrics.canonicalize)),
    );
    println!();
}

fn mechanism_names(mechanisms: MechanismSet) -> String {
    let mut names = Vec::new();
    if mechanisms.contains(MechanismSet::MULTIPLICATIVE) {
        names.push("multiplicative");
    }
    if mechanisms.contains(MechanismSet::ADDITIVE) {
        names.push("additive");
    }
    if mechanisms.contains(MechanismSet::SUBTRACTIVE) {
        names.push("subtractive");
    }
    if names.is_empty() {
        return "none".to_string();
    }
    names.join(" + ")
}
