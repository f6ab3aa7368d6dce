use anyhow::Context;
use models_pool_notifications::EmailMessage;
use serde::Serialize;

#[derive(Serialize)]
struct MailSendBody<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

pub(crate) async fn send_email(
    http: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    from_email: &str,
    message: &EmailMessage,
) -> anyhow::Result<()> {
    let body = MailSendBody {
        personalizations: vec![Personalization {
            to: vec![Address { email: &message.to }],
        }],
        from: Address { email: from_email },
        subject: &message.subject,
        content: vec![Content {
            content_type: "text/html",
            value: &message.html_body,
        }],
    };

    let response = http
        .post(format!("{base_url}/v3/mail/send"))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .context("sendgrid request failed")?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        anyhow::bail!("sendgrid returned {status}: {detail}");
    }

    Ok(())
}
