use std::io::{self, Write};

use crate::db::Memo;

pub fn memo(out: &mut impl Write, m: &Memo) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {} (ID: {})", m.created_at, m.tag, m.id)?;
    writeln!(out, "{}", m.title)?;
    writeln!(out, "{}", m.body)
}

pub fn memos(out: &mut impl Write, list: &[Memo]) -> io::Result<()> {
    for m in list {
        memo(out, m)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_layout() {
        let m = Memo {
            id: 7,
            created_at: "2024-01-02 03:04:05".into(),
            title: "Groceries".into(),
            body: "milk, eggs".into(),
            tag: "#home".into(),
        };
        let mut out = Vec::new();
        memo(&mut out, &m).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n2024-01-02 03:04:05 #home (ID: 7)\nGroceries\nmilk, eggs\n"
        );
    }
}
