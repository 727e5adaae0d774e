use crate::types::ArgumentVector;

struct Parser<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Parser<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		matches!(c, b' ' | b'\t' | b'\n' | b'\r')
	}

	fn is_letter(c: u8) -> bool {
		!Parser::is_whitespace(c)
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Parser::is_whitespace);
	}

	fn read_word(&mut self) -> &'a [u8] {
		let orig = self.i;
		self.proceed_while(Parser::is_letter);
		&self.line[orig .. self.i]
	}

	fn parse_words(&mut self) -> ArgumentVector {
		let mut words = vec![];
		loop {
			self.skip_whitespaces();
			let word = self.read_word();
			if word.is_empty() {
				break;
			}
			words.push(String::from_utf8_lossy(word).into_owned());
		}
		words
	}
}

/// Splits one input line into whitespace-separated arguments.
///
/// Operators (`|`, `<`, `>`, `>>`) are only recognized later, and only as whole
/// words; a blank line yields no arguments.
pub fn tokenize(line: &[u8]) -> ArgumentVector {
	let mut parser = Parser { line, i: 0 };
	parser.parse_words()
}
