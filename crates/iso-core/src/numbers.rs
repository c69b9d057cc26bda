/// English ordinal of `number`: `1st`, `2nd`, `3rd`, `11th`, `21st`, ...
pub fn ordinal(number: i64) -> String {
    let suffix = if (10..20).contains(&number.rem_euclid(100)) {
        "th"
    } else {
        match number.rem_euclid(10) {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{number}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals() {
        let rendered: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111, 112]
            .into_iter()
            .map(ordinal)
            .collect();
        insta::assert_snapshot!(rendered.join(" "), @"1st 2nd 3rd 4th 11th 12th 13th 21st 22nd 101st 111th 112th");
    }
}
