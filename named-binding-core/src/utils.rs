//! Utility functions for the binder
//!
//! This module provides the string normalization used when matching handler
//! parameter names against route parameter names.

/// Naming convention utilities for parameter names
pub mod naming {
    /// Converts an identifier to snake_case.
    ///
    /// An underscore is inserted before every ASCII uppercase letter that is not
    /// the first character, then the whole string is lowercased. Characters other
    /// than `A-Z` are kept as they are, so an already snake_case name is returned
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use named_binding_core::utils::naming::to_snake_case;
    ///
    /// assert_eq!(to_snake_case("userId"), "user_id");
    /// assert_eq!(to_snake_case("UserService"), "user_service");
    /// assert_eq!(to_snake_case("HTTPServer"), "h_t_t_p_server");
    /// assert_eq!(to_snake_case("user_id"), "user_id");
    /// ```
    pub fn to_snake_case(s: &str) -> String {
        let mut result = String::with_capacity(s.len() + s.len() / 2);

        for (index, ch) in s.chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if index > 0 {
                    result.push('_');
                }
                result.push(ch.to_ascii_lowercase());
            } else {
                result.push(ch.to_ascii_lowercase());
            }
        }

        result
    }

    /// Converts an identifier to camelCase.
    ///
    /// The input is split on `_` and `-`, the first letter of every word is
    /// uppercased, the separators are dropped and finally the first letter of the
    /// result is lowercased. The remaining letters of each word keep their case,
    /// which makes the conversion idempotent on camelCase input.
    ///
    /// # Examples
    ///
    /// ```
    /// use named_binding_core::utils::naming::to_camel_case;
    ///
    /// assert_eq!(to_camel_case("user_id"), "userId");
    /// assert_eq!(to_camel_case("post-slug"), "postSlug");
    /// assert_eq!(to_camel_case("UserService"), "userService");
    /// assert_eq!(to_camel_case("userId"), "userId");
    /// ```
    pub fn to_camel_case(s: &str) -> String {
        let mut joined = String::with_capacity(s.len());

        for word in s.split(['_', '-']) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                joined.push(first.to_ascii_uppercase());
                joined.push_str(chars.as_str());
            }
        }

        lower_first(&joined)
    }

    /// Lowercases the first character, leaving the rest untouched.
    pub fn lower_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => {
                let mut result = String::with_capacity(s.len());
                result.push(first.to_ascii_lowercase());
                result.push_str(chars.as_str());
                result
            }
        }
    }

    /// Returns every distinct key a parameter name may appear under in a route,
    /// in lookup order: the name itself, its snake_case form, its camelCase form.
    pub fn candidate_keys(name: &str) -> Vec<String> {
        let mut keys = Vec::with_capacity(3);
        for key in [name.to_string(), to_snake_case(name), to_camel_case(name)] {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    mod naming_tests {
        use super::super::naming::*;

        #[test]
        fn test_to_snake_case() {
            assert_eq!(to_snake_case("userId"), "user_id");
            assert_eq!(to_snake_case("UserService"), "user_service");
            assert_eq!(to_snake_case("DatabaseConnectionPool"), "database_connection_pool");
            assert_eq!(to_snake_case("HTTPServer"), "h_t_t_p_server");
            assert_eq!(to_snake_case("nullableParam"), "nullable_param");
            assert_eq!(to_snake_case(""), "");
            assert_eq!(to_snake_case("lowercase"), "lowercase");
        }

        #[test]
        fn test_to_camel_case() {
            assert_eq!(to_camel_case("user_id"), "userId");
            assert_eq!(to_camel_case("post-slug"), "postSlug");
            assert_eq!(to_camel_case("organization_member_id"), "organizationMemberId");
            assert_eq!(to_camel_case("UserService"), "userService");
            assert_eq!(to_camel_case("_id"), "id");
            assert_eq!(to_camel_case("a__b"), "aB");
            assert_eq!(to_camel_case("A"), "a");
            assert_eq!(to_camel_case(""), "");
        }

        #[test]
        fn test_conversions_are_idempotent() {
            for name in ["user_id", "post", "organization_member_id", "a_b_c"] {
                assert_eq!(to_snake_case(name), name);
                assert_eq!(to_snake_case(&to_snake_case(name)), to_snake_case(name));
            }

            for name in ["userId", "post", "organizationMemberId", "aBC"] {
                assert_eq!(to_camel_case(name), name);
                assert_eq!(to_camel_case(&to_camel_case(name)), to_camel_case(name));
            }
        }

        #[test]
        fn test_candidate_keys() {
            assert_eq!(candidate_keys("userId"), vec!["userId", "user_id"]);
            assert_eq!(candidate_keys("user_id"), vec!["user_id", "userId"]);
            assert_eq!(candidate_keys("post"), vec!["post"]);
        }
    }
}
