use std::io::{self, Write};

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        // EOF counts as the default answer, or as "no" without one
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
