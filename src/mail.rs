//! Ticket confirmation e-mails.
//!
//! Not hooked into booking: callers decide when a confirmation goes out.

use std::io::Cursor;

use derive_more::{Display, From};
use image::{ImageFormat, Luma};
use lettre::{
    message::{header::ContentType, Attachment, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
};
use qrcode::QrCode;

use crate::config;

const QR_CONTENT_ID: &str = "qrcode_image";

/// What a confirmation says about the booked ticket.
#[derive(Clone, Debug)]
pub struct TicketInfo {
    pub ticket_id: String,
    pub customer_name: String,
    pub movie_name: String,
    /// Human-readable start, e.g. `20:00 - 20/03/2026`.
    pub showtime: String,
    pub cinema: String,
    /// Comma-separated seat labels.
    pub seat: String,
}

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("invalid mailbox: {_0}")]
    Address(lettre::address::AddressError),
    #[display("failed to build message: {_0}")]
    Build(lettre::error::Error),
    #[display("invalid content type: {_0}")]
    ContentType(lettre::message::header::ContentTypeErr),
    #[display("failed to encode QR image: {_0}")]
    Image(image::ImageError),
    #[display("failed to generate QR code: {_0}")]
    Qr(qrcode::types::QrError),
    #[display("SMTP failure: {_0}")]
    Smtp(lettre::transport::smtp::Error),
}

pub struct TicketMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    ticket_url_base: String,
}

impl TicketMailer {
    pub fn new(config: config::Mail) -> Result<Self, Error> {
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
                &config.smtp_server,
            )?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            sender: config.sender,
            ticket_url_base: config.ticket_url_base,
        })
    }

    /// Sends the confirmation to `to`. Failures are logged, never raised.
    pub async fn send_ticket(&self, to: &str, ticket: &TicketInfo) -> bool {
        match self.try_send(to, ticket).await {
            Ok(()) => {
                tracing::info!(
                    to,
                    ticket_id = %ticket.ticket_id,
                    "ticket e-mail sent",
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    to,
                    ticket_id = %ticket.ticket_id,
                    "failed to send ticket e-mail: {e}",
                );
                false
            }
        }
    }

    async fn try_send(&self, to: &str, ticket: &TicketInfo) -> Result<(), Error> {
        let message = self.build_message(to, ticket)?;
        self.transport.send(message).await?;
        Ok(())
    }

    fn build_message(
        &self,
        to: &str,
        ticket: &TicketInfo,
    ) -> Result<Message, Error> {
        let url = format!("{}{}", self.ticket_url_base, ticket.ticket_id);
        let qr = Attachment::new_inline(QR_CONTENT_ID.to_owned())
            .body(qr_png(&url)?, ContentType::parse("image/png")?);

        Ok(Message::builder()
            .from(self.sender.parse()?)
            .to(to.parse()?)
            .subject(format!("Your movie ticket: {}", ticket.movie_name))
            .multipart(
                MultiPart::related()
                    .singlepart(SinglePart::html(render_html(ticket)))
                    .singlepart(qr),
            )?)
    }
}

/// Renders `data` as a PNG-encoded QR code.
pub fn qr_png(data: &str) -> Result<Vec<u8>, Error> {
    let image = QrCode::new(data.as_bytes())?
        .render::<Luma<u8>>()
        .module_dimensions(10, 10)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

fn escape(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut out, c| {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                c => out.push(c),
            }
            out
        })
}

/// HTML body of the confirmation; the QR code is referenced by content id.
pub fn render_html(ticket: &TicketInfo) -> String {
    let row = |label: &str, value: &str, shaded: bool| {
        let style = if shaded {
            r#" style="background-color: #f9f9f9;""#
        } else {
            ""
        };
        format!(
            r#"<tr{style}>
              <td style="padding: 10px; border: 1px solid #ddd;"><strong>{label}:</strong></td>
              <td style="padding: 10px; border: 1px solid #ddd;">{}</td>
            </tr>"#,
            escape(value),
        )
    };

    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; color: #333;">
    <div style="border: 1px solid #ddd; padding: 20px; max-width: 600px; margin: auto;">
      <h2 style="color: #e50914;">Thank you for your booking!</h2>
      <p>Hello <strong>{customer}</strong>,</p>
      <p>Here are your ticket details:</p>
      <table style="width: 100%; border-collapse: collapse; margin-bottom: 20px;">
        {movie}
        {showtime}
        {cinema}
        {seat}
      </table>
      <div style="text-align: center; margin: 20px 0;">
        <p>Please show this QR code at the entrance:</p>
        <img src="cid:{QR_CONTENT_ID}" alt="QR Code" style="width: 200px; height: 200px; border: 1px solid #ccc;">
        <p style="font-size: 12px; color: #777;">Ticket ID: {ticket_id}</p>
      </div>
      <hr style="border: 0; border-top: 1px solid #eee;">
      <p style="font-size: 12px; text-align: center;">Enjoy the movie!</p>
    </div>
  </body>
</html>"#,
        customer = escape(&ticket.customer_name),
        movie = row("Movie", &ticket.movie_name, true),
        showtime = row("Showtime", &ticket.showtime, false),
        cinema = row("Cinema", &ticket.cinema, true),
        seat = row("Seat", &ticket.seat, false),
        ticket_id = escape(&ticket.ticket_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> TicketInfo {
        TicketInfo {
            ticket_id: "TICKET-2026-XYZ-999".into(),
            customer_name: "Lan <Nguyen>".into(),
            movie_name: "Forrest Gump".into(),
            showtime: "20:00 - 20/03/2026".into(),
            cinema: "Central".into(),
            seat: "H8, H9".into(),
        }
    }

    #[test]
    fn html_references_inline_qr_code() {
        let html = render_html(&ticket());
        assert!(html.contains(r#"src="cid:qrcode_image""#));
        assert!(html.contains("TICKET-2026-XYZ-999"));
        assert!(html.contains("H8, H9"));
        assert!(html.contains("20:00 - 20/03/2026"));
    }

    #[test]
    fn html_escapes_ticket_fields() {
        let html = render_html(&ticket());
        assert!(html.contains("Lan &lt;Nguyen&gt;"));
        assert!(!html.contains("<Nguyen>"));
    }

    #[test]
    fn qr_code_is_png() {
        let png = qr_png("https://example.com/tickets/42").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn builds_related_multipart_message() {
        let mailer = TicketMailer::new(config::Mail {
            smtp_server: "smtp.example.com".into(),
            smtp_port: 587,
            username: "tickets".into(),
            password: "password".into(),
            sender: "Cinema <tickets@example.com>".into(),
            ticket_url_base: "https://example.com/tickets/".into(),
        })
        .unwrap();

        let message = mailer
            .build_message("lan@example.com", &ticket())
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/related"));
        assert!(raw.contains("Content-ID: <qrcode_image>"));
        assert!(raw.contains("image/png"));

        assert!(mailer.build_message("not an address", &ticket()).is_err());
    }
}
