use std::io::BufRead;

/// One product name per line; blank lines and `#` comments are skipped.
pub fn read_names<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        names.push(trimmed.to_string());
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let raw = "Pams Milk 2L\n\n  # header\n  Avocado Half  \n";
        let names = read_names(raw.as_bytes()).unwrap();
        assert_eq!(names, vec!["Pams Milk 2L", "Avocado Half"]);
    }
}
