pub mod json;

pub fn join<S: ToString>(vec: &[S], sep: &str) -> String {
    vec
        .iter()
        .fold("".to_string(), |a, b| if a.len() > 0 { a + sep } else { a } + &b.to_string())
}

#[cfg(test)]
mod tests {
    use super::join;

    #[test]
    fn join_separates_items() {
        assert_eq!(join(&["u1", "u2", "u3"], ", "), "u1, u2, u3");
        assert_eq!(join::<&str>(&[], ", "), "");
    }
}
