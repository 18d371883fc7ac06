/**
 * Terminal layer viewer
 *
 * Shows a layer stack one layer at a time as ASCII art and waits for a line
 * of input between layers: `p` goes back one layer, `q` (or ESC) stops,
 * anything else moves on. The cycle ends after the last layer.
 *
 * Input and output are generic so the viewer runs the same against a
 * terminal and against in-memory buffers.
 */

use std::io::{self, BufRead, Write};

use crate::export::LayerStack;

/// Characters from dark to bright
const RAMP: &[u8] = b" .:-=+*#%@";

const ESC: char = '\u{1b}';

/// What one line of input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Show the next layer
    Next,
    /// Show the previous layer
    Previous,
    /// Stop viewing
    Quit,
}

impl ViewerCommand {
    /// Interpret one line of input
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "p" | "P" | "<" => ViewerCommand::Previous,
            "q" | "Q" => ViewerCommand::Quit,
            s if s.starts_with(ESC) => ViewerCommand::Quit,
            _ => ViewerCommand::Next,
        }
    }
}

/// Character for an 8-bit level
fn shade(level: u8) -> char {
    let i = level as usize * RAMP.len() / 256;
    RAMP[i] as char
}

/// Render one layer as text, one line per row
pub fn render_layer(stack: &LayerStack, z: usize) -> String {
    let width = stack.width();
    let mut out = String::with_capacity((width * 2 + 1) * stack.height());
    for row in stack.layer(z).chunks(width) {
        for &level in row {
            // doubled to keep voxels roughly square in a terminal
            let c = shade(level);
            out.push(c);
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// Walk through the layers until the end, a quit command or end of input
///
/// Returns the number of layers shown.
pub fn view_layers<R: BufRead, W: Write>(
    stack: &LayerStack,
    mut input: R,
    mut output: W,
) -> io::Result<usize> {
    let mut z = 0;
    let mut shown = 0;
    let mut line = String::new();

    while z < stack.len() {
        writeln!(output, "Layer {}/{}", z + 1, stack.len())?;
        output.write_all(render_layer(stack, z).as_bytes())?;
        writeln!(output, "[enter] next  [p] previous  [q] quit")?;
        output.flush()?;
        shown += 1;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match ViewerCommand::parse(&line) {
            ViewerCommand::Next => z += 1,
            ViewerCommand::Previous => z = z.saturating_sub(1),
            ViewerCommand::Quit => break,
        }
    }

    Ok(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Dims, ScalarField};
    use crate::generator::DitherVolume;
    use std::io::Cursor;

    fn stack() -> LayerStack {
        let dims = Dims::new(3, 2, 4);
        let n = dims.volume() as f32;
        LayerStack::from_volume(&DitherVolume::from_ranks(ScalarField::from_fn(dims, |c| {
            dims.index_of(c) as f32 / n
        })))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ViewerCommand::parse("\n"), ViewerCommand::Next);
        assert_eq!(ViewerCommand::parse("x\n"), ViewerCommand::Next);
        assert_eq!(ViewerCommand::parse("p\n"), ViewerCommand::Previous);
        assert_eq!(ViewerCommand::parse("q\n"), ViewerCommand::Quit);
        assert_eq!(ViewerCommand::parse("\u{1b}\n"), ViewerCommand::Quit);
    }

    #[test]
    fn test_shade_extremes() {
        assert_eq!(shade(0), ' ');
        assert_eq!(shade(255), '@');
    }

    #[test]
    fn test_render_layer_shape() {
        let text = render_layer(&stack(), 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 6));
        assert!(text.starts_with("  "));
    }

    #[test]
    fn test_view_all_layers() {
        let mut out = Vec::new();
        let shown = view_layers(&stack(), Cursor::new("\n\n\n\n"), &mut out).unwrap();
        assert_eq!(shown, 4);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Layer 4/4"));
    }

    #[test]
    fn test_view_back_and_quit() {
        let mut out = Vec::new();
        let shown = view_layers(&stack(), Cursor::new("\np\n\nq\n"), &mut out).unwrap();
        assert_eq!(shown, 4);
        let text = String::from_utf8(out).unwrap();
        let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("Layer")).collect();
        assert_eq!(headers, vec!["Layer 1/4", "Layer 2/4", "Layer 1/4", "Layer 2/4"]);
    }

    #[test]
    fn test_view_stops_at_end_of_input() {
        let mut out = Vec::new();
        let shown = view_layers(&stack(), Cursor::new(""), &mut out).unwrap();
        assert_eq!(shown, 1);
    }
}
