use regex::Regex;

/// Rewrites `?` placeholders into the `$1, $2, ...` form Postgres expects and
/// collapses whitespace, so queries can be written as indented blocks.
pub fn sql(query: &str) -> String {
    let placeholder = Regex::new(r"\?").unwrap();
    let mut result = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 1;
    while let Some(found) = placeholder.find(&result) {
        result.replace_range(found.range(), &format!("${}", param_index));
        param_index += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::sql;

    #[test]
    fn numbers_placeholders_in_order() {
        assert_eq!(
            sql("INSERT INTO t (a, b)\n VALUES (?, ?)"),
            "INSERT INTO t (a, b) VALUES ($1, $2)"
        );
    }
}
