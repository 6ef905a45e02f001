//! Operator output on stdout

use tokio::sync::mpsc;
use waytv_control::ControlEvent;
use waytv_core::DigitMap;

/// One line for a control event
pub fn format_event(event: &ControlEvent) -> String {
    match event {
        ControlEvent::Notice { message } => message.clone(),
        ControlEvent::ChannelChanged {
            channel,
            family,
            digit,
        } => match digit {
            Some(digit) => format!("[{}] {} ({})", digit, channel, family),
            None => format!("[-] {} ({})", channel, family),
        },
        ControlEvent::ActiveFamilyChanged { from, to } => format!(
            "Application: {} -> {}",
            from.map_or("none".to_string(), |f| f.to_string()),
            to.map_or("none".to_string(), |f| f.to_string())
        ),
        ControlEvent::Error { source, message } => format!("Error ({}): {}", source, message),
    }
}

/// Key help and the channel table, printed at startup
pub fn banner(digits: &DigitMap) -> String {
    let mut text = String::from(
        "Keypad: 0-9 channel, +/- next/previous, Enter start, Backspace stop, Esc quit\n\
         Terminal: 0-9 channel, +/- next/previous, N start, M stop, WASD move, \
         Enter confirm, Q back, K quit\n",
    );
    for (digit, channel) in digits.iter() {
        text.push_str(&format!("  {}  {}\n", digit, channel));
    }
    text
}

/// Print every event until the dispatcher goes away
pub async fn print_events(mut event_rx: mpsc::Receiver<ControlEvent>) {
    while let Some(event) = event_rx.recv().await {
        println!("{}", format_event(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waytv_core::{AppFamily, LogicalChannel};

    #[test]
    fn test_format_channel_change() {
        let event = ControlEvent::ChannelChanged {
            channel: LogicalChannel::EonPink,
            family: AppFamily::Eon,
            digit: Some(9),
        };
        assert_eq!(format_event(&event), "[9] Pink (EON)");
    }

    #[test]
    fn test_format_family_change() {
        let event = ControlEvent::ActiveFamilyChanged {
            from: Some(AppFamily::Svt),
            to: None,
        };
        assert_eq!(format_event(&event), "Application: SVT Play -> none");
    }

    #[test]
    fn test_banner_lists_every_digit() {
        let text = banner(&DigitMap::default());
        assert_eq!(text.lines().count(), 12);
        assert!(text.contains("  0  RTS 1"));
    }
}
