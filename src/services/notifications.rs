//! Email notifications: weekly report, tracking reminder, milestone.

use serde::{Deserialize, Serialize};

use crate::services::mailer::{MailSender, OutboundEmail};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseReport {
    pub total_workouts: i64,
    pub total_minutes: f64,
    pub total_calories: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepReport {
    pub average_duration: f64,
    pub days_logged: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationReport {
    pub average_intake: f64,
    pub target_achieved_days: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReport {
    pub average_calories: f64,
    pub total_meals: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub exercise: ExerciseReport,
    pub sleep: SleepReport,
    pub hydration: HydrationReport,
    pub nutrition: NutritionReport,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
}

impl Milestone {
    pub fn test_notification() -> Self {
        Self {
            title: "Test Notification".into(),
            description: "This is a test email to confirm your notification settings are working correctly.".into(),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn weekly_report_email(to: &str, report: &WeeklyReport) -> OutboundEmail {
    let html = format!(
        r#"
<h2>Your Weekly Health Report</h2>
<p>Here's a summary of your health tracking for the past week:</p>

<h3>Exercise Summary</h3>
<ul>
    <li>Total Workouts: {workouts}</li>
    <li>Total Minutes: {minutes}</li>
    <li>Calories Burned: {calories}</li>
</ul>

<h3>Sleep Analysis</h3>
<ul>
    <li>Average Duration: {sleep_avg} hours</li>
    <li>Days Tracked: {sleep_days}</li>
</ul>

<h3>Hydration</h3>
<ul>
    <li>Average Daily Intake: {litres}L</li>
    <li>Target Achievement: {target_days} days</li>
</ul>

<h3>Nutrition Overview</h3>
<ul>
    <li>Average Daily Calories: {avg_kcal} kcal</li>
    <li>Total Meals Tracked: {meals}</li>
</ul>

<p>Keep up the good work! Regular tracking helps you maintain a healthy lifestyle.</p>
"#,
        workouts = report.exercise.total_workouts,
        minutes = report.exercise.total_minutes,
        calories = report.exercise.total_calories,
        sleep_avg = round_to(report.sleep.average_duration, 1),
        sleep_days = report.sleep.days_logged,
        litres = round_to(report.hydration.average_intake / 1000.0, 1),
        target_days = report.hydration.target_achieved_days,
        avg_kcal = report.nutrition.average_calories.round(),
        meals = report.nutrition.total_meals,
    );

    OutboundEmail {
        to: to.to_string(),
        subject: "Your Weekly Health Report".into(),
        html,
    }
}

pub fn tracking_reminder_email(to: &str, untracked: &[&str], frontend_url: &str) -> OutboundEmail {
    let items: String = untracked
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    let html = format!(
        r#"
<h2>Daily Tracking Reminder</h2>
<p>Hey there! We noticed you haven't tracked the following today:</p>
<ul>{items}</ul>
<p>Consistent tracking helps you achieve your health goals. Take a moment to log your activities!</p>
<a href="{url}/tracking/daily" style="display: inline-block; padding: 10px 20px; background-color: #007bff; color: white; text-decoration: none; border-radius: 5px;">Track Now</a>
"#,
        items = items,
        url = frontend_url.trim_end_matches('/'),
    );

    OutboundEmail {
        to: to.to_string(),
        subject: "Reminder: Track Your Daily Health Activities".into(),
        html,
    }
}

pub fn milestone_email(to: &str, milestone: &Milestone) -> OutboundEmail {
    let html = format!(
        r#"
<h2>Congratulations! 🎉</h2>
<p>You've achieved a new milestone in your health journey:</p>
<div style="padding: 20px; background-color: #f8f9fa; border-radius: 5px; margin: 20px 0;">
    <h3 style="color: #28a745">{title}</h3>
    <p>{description}</p>
</div>
<p>Keep pushing forward! Every achievement brings you closer to your health goals.</p>
"#,
        title = escape_html(&milestone.title),
        description = escape_html(&milestone.description),
    );

    OutboundEmail {
        to: to.to_string(),
        subject: "New Health Milestone Achieved!".into(),
        html,
    }
}

/// Formats notifications and hands them to the configured sender.
pub struct Dispatcher<'a> {
    mailer: &'a dyn MailSender,
    frontend_url: &'a str,
}

impl<'a> Dispatcher<'a> {
    pub fn new(mailer: &'a dyn MailSender, frontend_url: &'a str) -> Self {
        Self {
            mailer,
            frontend_url,
        }
    }

    pub async fn weekly_report(&self, to: &str, report: &WeeklyReport) -> anyhow::Result<String> {
        self.mailer.send(weekly_report_email(to, report)).await
    }

    /// Sends nothing when every dimension is tracked.
    pub async fn tracking_reminder(&self, to: &str, untracked: &[&str]) -> anyhow::Result<Option<String>> {
        if untracked.is_empty() {
            tracing::debug!(to = %to, "All dimensions tracked; reminder skipped");
            return Ok(None);
        }
        let email = tracking_reminder_email(to, untracked, self.frontend_url);
        self.mailer.send(email).await.map(Some)
    }

    pub async fn milestone(&self, to: &str, milestone: &Milestone) -> anyhow::Result<String> {
        self.mailer.send(milestone_email(to, milestone)).await
    }
}
