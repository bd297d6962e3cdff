//! Entity escaping for stored values and comments.
//!
//! Values are written with the five XML character entities escaped, so a
//! stored tree survives formats that treat markup characters specially.
//! Unescaping also accepts decimal and hexadecimal character references.

/// Escapes `&`, `<`, `>`, `"` and `'` as character entities.
pub fn escape_text(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&apos;"),
			other => out.push(other),
		}
	}
	out
}

/// Reverses [`escape_text`]. Unknown or malformed entities are kept verbatim.
pub fn unescape_text(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut rest = text;
	while let Some(start) = rest.find('&') {
		out.push_str(&rest[..start]);
		let tail = &rest[start..];
		match tail.find(';').and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end))) {
			Some((ch, end)) => {
				out.push(ch);
				rest = &tail[end + 1..];
			}
			None => {
				out.push('&');
				rest = &tail[1..];
			}
		}
	}
	out.push_str(rest);
	out
}

fn decode_entity(entity: &str) -> Option<char> {
	match entity {
		"amp" => Some('&'),
		"lt" => Some('<'),
		"gt" => Some('>'),
		"quot" => Some('"'),
		"apos" => Some('\''),
		_ => {
			let code = entity.strip_prefix('#')?;
			let code = match code.strip_prefix(['x', 'X']) {
				Some(hex) => u32::from_str_radix(hex, 16).ok()?,
				None => code.parse::<u32>().ok()?,
			};
			char::from_u32(code)
		}
	}
}
