//! Property-based tests for the password generator.
//!
//! For any options enabling at least one character class, the output has
//! exactly the requested length and every character comes from the
//! universe those options describe.

use lockkey::generators::password::{AMBIGUOUS_CHARS, SIMILAR_CHARS};
use lockkey::generators::{generate_password, universe, GeneratorError};
use lockkey::models::PasswordOptions;
use proptest::prelude::*;

fn arb_options() -> impl Strategy<Value = PasswordOptions> {
    (
        0usize..200,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(length, upper, lower, numbers, symbols, spaces, similar, ambiguous)| {
                PasswordOptions {
                    length,
                    include_uppercase: upper,
                    include_lowercase: lower,
                    include_numbers: numbers,
                    include_symbols: symbols,
                    include_spaces: spaces,
                    exclude_similar: similar,
                    exclude_ambiguous: ambiguous,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn output_has_requested_length_and_stays_in_universe(options in arb_options()) {
        prop_assume!(options.has_category());

        let allowed = universe(&options);
        let password = generate_password(&options).expect("at least one class is enabled");

        prop_assert_eq!(password.chars().count(), options.length);
        prop_assert!(password.chars().all(|c| allowed.contains(&c)));
    }

    #[test]
    fn exclusions_are_honoured(options in arb_options()) {
        prop_assume!(options.has_category());

        let password = generate_password(&options).expect("at least one class is enabled");

        if options.exclude_similar {
            prop_assert!(!password.chars().any(|c| SIMILAR_CHARS.contains(c)));
        }
        if options.exclude_ambiguous {
            prop_assert!(!password.chars().any(|c| AMBIGUOUS_CHARS.contains(c)));
        }
        if !options.include_spaces {
            prop_assert!(!password.contains(' '));
        }
    }

    #[test]
    fn no_class_means_empty_charset(
        length in 0usize..100,
        similar in any::<bool>(),
        ambiguous in any::<bool>(),
    ) {
        let options = PasswordOptions {
            length,
            include_uppercase: false,
            include_lowercase: false,
            include_numbers: false,
            include_symbols: false,
            include_spaces: false,
            exclude_similar: similar,
            exclude_ambiguous: ambiguous,
        };

        prop_assert_eq!(generate_password(&options), Err(GeneratorError::EmptyCharset));
    }
}

#[test]
fn spaces_only_output_is_all_spaces() {
    let password = generate_password(&PasswordOptions::spaces_only(16)).unwrap();
    assert_eq!(password, " ".repeat(16));
}

#[test]
fn successive_outputs_differ() {
    let options = PasswordOptions {
        length: 32,
        ..Default::default()
    };
    let first = generate_password(&options).unwrap();
    let second = generate_password(&options).unwrap();
    assert_ne!(first, second);
}
