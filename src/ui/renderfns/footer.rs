use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar: breadcrumb on the left, current route on the right.
///
/// A transient notice (logout failure, etc.) replaces the breadcrumb until
/// it expires.
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  route: Option<&str>,
  notice: Option<&str>,
) {
  if let Some(message) = notice {
    let paragraph = Paragraph::new(format!(" {}", message))
      .style(Style::default().fg(Color::Red).bg(Color::Black));
    frame.render_widget(paragraph, area);
    return;
  }

  let mut spans = Vec::new();
  spans.push(Span::raw(" "));

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  if let Some(route) = route {
    let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let route_text = format!(":{} ", route);
    let pad = (area.width as usize)
      .saturating_sub(left_width)
      .saturating_sub(route_text.chars().count());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(
      route_text,
      Style::default().fg(Color::DarkGray),
    ));
  }

  let line = Line::from(spans);
  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
