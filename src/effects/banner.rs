//! Console greeting printed once at startup.

pub fn banner_lines(title: &str) -> Vec<String> {
    let heading = if title.is_empty() { "HELLO THERE" } else { title };
    let rule = "=".repeat(heading.chars().count().max(24));
    vec![
        rule.clone(),
        heading.to_uppercase(),
        "Curious? Try the arrow keys, then B, A.".to_string(),
        rule,
    ]
}

pub fn log_banner(title: &str) {
    for line in banner_lines(title) {
        log::info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_frames_title() {
        let lines = banner_lines("Jane Doe — Portfolio");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "JANE DOE — PORTFOLIO");
        assert_eq!(lines[0], lines[3]);
        assert_eq!(banner_lines("")[1], "HELLO THERE");
    }
}
