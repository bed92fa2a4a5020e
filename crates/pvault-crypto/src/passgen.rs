//! Password and passphrase generation

use rand::seq::SliceRandom;
use rand::Rng;

use pvault_core::{VaultError, VaultResult};

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Characters easily confused with one another when read back.
const SIMILAR_CHARS: &str = "il1Lo0O";

const PASSPHRASE_WORDS: &[&str] = &[
    "correct", "horse", "battery", "staple", "dragon", "monkey", "sunset", "ocean",
    "mountain", "river", "forest", "thunder", "lightning", "crystal", "phoenix", "tiger",
    "eagle", "falcon", "wolf", "bear", "lion", "panther", "cobra", "viper",
    "galaxy", "nebula", "comet", "meteor", "planet", "stellar", "cosmic", "lunar",
    "solar", "quantum", "atomic", "nuclear", "fusion", "plasma", "photon", "neutron",
    "alpha", "beta", "gamma", "delta", "omega", "sigma", "theta", "lambda",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub exclude_similar: bool,
}

impl PasswordOptions {
    pub fn strong() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
            exclude_similar: true,
        }
    }

    pub fn memorable() -> Self {
        Self {
            length: 12,
            symbols: false,
            ..Self::strong()
        }
    }

    pub fn pin() -> Self {
        Self {
            length: 6,
            uppercase: false,
            lowercase: false,
            numbers: true,
            symbols: false,
            exclude_similar: false,
        }
    }

    pub fn maximum() -> Self {
        Self {
            length: 32,
            exclude_similar: false,
            ..Self::strong()
        }
    }

    fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.uppercase {
            classes.push(UPPERCASE);
        }
        if self.lowercase {
            classes.push(LOWERCASE);
        }
        if self.numbers {
            classes.push(NUMBERS);
        }
        if self.symbols {
            classes.push(SYMBOLS);
        }
        classes
    }
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self::strong()
    }
}

fn filter_similar(charset: &str, exclude_similar: bool) -> Vec<char> {
    charset
        .chars()
        .filter(|c| !exclude_similar || !SIMILAR_CHARS.contains(*c))
        .collect()
}

/// Generate a random password.
///
/// Every selected character class is guaranteed to appear at least once
/// (for lengths >= the number of selected classes).
pub fn generate_password(options: &PasswordOptions) -> VaultResult<String> {
    let classes = options.classes();
    if classes.is_empty() {
        return Err(VaultError::Validation(
            "at least one character class must be selected".into(),
        ));
    }

    let charset: Vec<char> = classes
        .iter()
        .flat_map(|class| filter_similar(class, options.exclude_similar))
        .collect();

    let mut rng = rand::thread_rng();
    let mut password: Vec<char> = (0..options.length)
        .map(|_| *charset.choose(&mut rng).expect("charset is non-empty"))
        .collect();

    // Patch in one character from each class that ended up missing.
    for class in &classes {
        if !password.iter().any(|c| class.contains(*c)) && !password.is_empty() {
            let pool = filter_similar(class, options.exclude_similar && *class != SYMBOLS);
            let index = rng.gen_range(0..password.len());
            password[index] = *pool.choose(&mut rng).expect("class pool is non-empty");
        }
    }

    Ok(password.into_iter().collect())
}

/// Generate a word-based passphrase with a trailing two-digit number,
/// e.g. `Correct-Nebula-Tiger-Omega-42`.
pub fn generate_passphrase(word_count: usize, separator: char, capitalize: bool) -> String {
    let mut rng = rand::thread_rng();
    let mut words: Vec<String> = (0..word_count)
        .map(|_| {
            let word = *PASSPHRASE_WORDS.choose(&mut rng).expect("word list is non-empty");
            if capitalize {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            } else {
                word.to_string()
            }
        })
        .collect();

    words.push(rng.gen_range(0..100u32).to_string());
    words.join(&separator.to_string())
}

/// Charset-size entropy estimate in bits.
pub fn entropy_bits(password: &str) -> f64 {
    if password.is_empty() {
        return 0.0;
    }

    let mut charset_size = 0usize;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        charset_size += 26;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        charset_size += 26;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        charset_size += 10;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        charset_size += 32;
    }

    (charset_size as f64).log2() * password.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_preset_covers_all_classes() {
        let password = generate_password(&PasswordOptions::strong()).unwrap();

        assert_eq!(password.chars().count(), 16);
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| SYMBOLS.contains(c)));
    }

    #[test]
    fn test_strong_preset_excludes_similar_chars() {
        for _ in 0..20 {
            let password = generate_password(&PasswordOptions::strong()).unwrap();
            assert!(
                !password.chars().any(|c| SIMILAR_CHARS.contains(c)),
                "similar chars leaked into {password:?}"
            );
        }
    }

    #[test]
    fn test_pin_preset_is_numeric() {
        let pin = generate_password(&PasswordOptions::pin()).unwrap();
        assert_eq!(pin.len(), 6);
        assert!(pin.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_no_classes_selected_is_an_error() {
        let options = PasswordOptions {
            uppercase: false,
            lowercase: false,
            numbers: false,
            symbols: false,
            ..PasswordOptions::strong()
        };
        assert!(matches!(
            generate_password(&options),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn test_passwords_are_not_repeated() {
        let a = generate_password(&PasswordOptions::maximum()).unwrap();
        let b = generate_password(&PasswordOptions::maximum()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_passphrase_shape() {
        let phrase = generate_passphrase(4, '-', true);
        let parts: Vec<&str> = phrase.split('-').collect();

        assert_eq!(parts.len(), 5, "four words plus trailing number");
        assert!(parts[4].parse::<u32>().unwrap() < 100);
        for word in &parts[..4] {
            assert!(word.chars().next().unwrap().is_ascii_uppercase());
        }
    }

    #[test]
    fn test_entropy_scales_with_charset() {
        assert_eq!(entropy_bits(""), 0.0);
        assert!(entropy_bits("abcdefgh") < entropy_bits("abcdefg1"));
        assert!(entropy_bits("abcdefg1") < entropy_bits("Abcdef1!"));
    }
}
