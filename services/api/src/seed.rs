use crate::commands::prepare;
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::Args;
use tinysteps::accounts::{AccountError, Credentials, Registration, User};
use tinysteps::api::AppContext;
use tinysteps::children::{
    CalendarEventDraft, ChildDraft, ChildServiceError, EventType, Gender, MilestoneDraft,
    VaccineDraft,
};
use tinysteps::error::AppError;
use tinysteps::forum::{ForumCategory, PostDraft};
use tracing::info;

/// Shared password of every demo account.
pub(crate) const DEMO_PASSWORD: &str = "tinysteps-demo-1";

const PARENT_NAMES: [(&str, &str); 6] = [
    ("Laura", "Mendez"),
    ("Tom", "Becker"),
    ("Aisha", "Khan"),
    ("Mark", "Olsen"),
    ("Sofia", "Rossi"),
    ("Ken", "Tanaka"),
];

const CHILD_NAMES: [(&str, Gender); 6] = [
    ("Mia", Gender::Female),
    ("Leo", Gender::Male),
    ("Zara", Gender::Female),
    ("Noah", Gender::Male),
    ("Ella", Gender::Female),
    ("Yuki", Gender::Male),
];

const TOPICS: [(&str, &str, ForumCategory); 8] = [
    (
        "How do you handle the four month sleep regression?",
        "Our little one suddenly wakes every two hours. What helped you get through it?",
        ForumCategory::Sleep,
    ),
    (
        "First foods: purees or baby-led weaning?",
        "We are about to start solids and cannot decide between the two approaches.",
        ForumCategory::Feeding,
    ),
    (
        "Teething remedies that actually work",
        "Cold washcloths only go so far. Share what calmed your baby during teething.",
        ForumCategory::Care,
    ),
    (
        "When did your baby start crawling?",
        "Ours is nine months and prefers rolling everywhere. Should we worry?",
        ForumCategory::Development,
    ),
    (
        "Fever after vaccinations",
        "Is a mild fever the evening after the two month shots normal?",
        ForumCategory::Health,
    ),
    (
        "Best advice you got as a new parent",
        "Looking for the one tip that made the first weeks easier.",
        ForumCategory::Advice,
    ),
    (
        "Dropping the night feed",
        "How did you wean off night feeds without too many tears?",
        ForumCategory::Feeding,
    ),
    (
        "Nap schedule for a one year old",
        "Two naps or one? Our daycare and our pediatrician disagree.",
        ForumCategory::Sleep,
    ),
];

const REPLIES: [&str; 6] = [
    "We went through the same thing, it passed after about two weeks.",
    "Our pediatrician suggested keeping a simple log, it really helped.",
    "Consistency was the key for us, same routine every evening.",
    "Every baby is different, try not to compare too much.",
    "Thanks for asking this, I was wondering the same.",
    "A warm bath before bed made a big difference here.",
];

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// Number of demo parent accounts
    #[arg(long, default_value_t = 3)]
    pub(crate) parents: usize,
    /// Number of forum threads to open
    #[arg(long, default_value_t = 5)]
    pub(crate) posts: usize,
    /// Replies per forum thread
    #[arg(long, default_value_t = 3)]
    pub(crate) comments: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedReport {
    pub(crate) parents: usize,
    pub(crate) children: usize,
    pub(crate) events: usize,
    pub(crate) posts: usize,
    pub(crate) comments: usize,
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let (_, runtime) = prepare()?;
    let report = seed(&runtime.context, &args, Local::now().date_naive())?;
    runtime.persist()?;

    println!(
        "Seeded {} parents, {} children, {} calendar events, {} forum posts and {} comments",
        report.parents, report.children, report.events, report.posts, report.comments
    );
    println!("Demo accounts use the password {DEMO_PASSWORD}");
    Ok(())
}

/// Creates demo parents with one child each, then forum threads with replies.
///
/// Accounts and children that already exist are reused, so seeding twice
/// only adds forum content.
pub(crate) fn seed(
    context: &AppContext,
    args: &SeedArgs,
    today: NaiveDate,
) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();
    let count = args.parents.min(PARENT_NAMES.len());
    let mut parents = Vec::with_capacity(count);

    for (index, (first, last)) in PARENT_NAMES.iter().take(count).enumerate() {
        let username = format!("{}_{}", first.to_lowercase(), last.to_lowercase());
        let (parent, created) = demo_parent(context, &username, first, last)?;
        if created {
            report.parents += 1;
        }
        if let Some(events) = demo_child(context, &parent, index, today)? {
            report.children += 1;
            report.events += events;
        }
        parents.push(parent);
    }

    if parents.is_empty() {
        return Ok(report);
    }

    for (index, (title, desc, category)) in TOPICS.iter().cycle().take(args.posts).enumerate() {
        let author = &parents[index % parents.len()];
        let post = context
            .forum
            .create(
                author,
                PostDraft {
                    title: title.to_string(),
                    desc: desc.to_string(),
                    category: *category,
                },
            )
            .map_err(AppError::command)?;
        report.posts += 1;

        for reply in 0..args.comments {
            let commenter = &parents[(index + reply + 1) % parents.len()];
            let text = REPLIES[(index + reply) % REPLIES.len()];
            context
                .forum
                .add_comment(commenter, post.id, text)
                .map_err(AppError::command)?;
            report.comments += 1;
        }
    }

    info!(
        parents = report.parents,
        posts = report.posts,
        comments = report.comments,
        "demo data seeded"
    );
    Ok(report)
}

fn demo_parent(
    context: &AppContext,
    username: &str,
    first: &str,
    last: &str,
) -> Result<(User, bool), AppError> {
    let registration = Registration {
        username: username.to_string(),
        email: format!("{username}@tinysteps.demo"),
        password: DEMO_PASSWORD.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
    };
    match context.accounts.register(registration) {
        Ok(user) => Ok((user, true)),
        Err(AccountError::UsernameTaken) => {
            let session = context
                .accounts
                .login(Credentials {
                    username: username.to_string(),
                    password: DEMO_PASSWORD.to_string(),
                })
                .map_err(AppError::command)?;
            let user = context
                .accounts
                .get(session.user_id)
                .map_err(AppError::command)?;
            context
                .accounts
                .logout(&session.token)
                .map_err(AppError::command)?;
            Ok((user, false))
        }
        Err(err) => Err(AppError::command(err)),
    }
}

/// Returns the number of calendar events created, or `None` when the child
/// was already there.
fn demo_child(
    context: &AppContext,
    parent: &User,
    index: usize,
    today: NaiveDate,
) -> Result<Option<usize>, AppError> {
    let (name, gender) = CHILD_NAMES[index % CHILD_NAMES.len()];
    let months = 3 + 4 * index as i64;
    let birth_date = today - Duration::days(months * 30);
    let children = &context.children;

    let child = match children.create(
        parent.id,
        ChildDraft {
            name: name.to_string(),
            second_name: None,
            birth_date,
            gender,
            weight: Some(5.5 + months as f32 * 0.4),
            height: Some(58.0 + months as f32 * 1.5),
            desc: None,
            image_url: None,
        },
        today,
    ) {
        Ok(child) => child,
        Err(ChildServiceError::DuplicateName(_)) => return Ok(None),
        Err(err) => return Err(AppError::command(err)),
    };

    children
        .add_milestone(
            parent.id,
            child.id,
            MilestoneDraft {
                title: "First smile".to_string(),
                achieved_date: birth_date + Duration::days(45),
                description: format!("{name} smiled back for the first time."),
                photo_url: None,
            },
        )
        .map_err(AppError::command)?;

    children
        .add_vaccine(
            parent.id,
            child.id,
            VaccineDraft {
                name: "Hepatitis B".to_string(),
                date: birth_date,
                notes: Some("First dose at the hospital".to_string()),
                administered: true,
                next_dose_date: Some(birth_date + Duration::days(60)),
            },
        )
        .map_err(AppError::command)?;

    let events = [
        CalendarEventDraft {
            title: format!("Check-up for {name}"),
            event_type: EventType::Doctor,
            date: today + Duration::days(1),
            time: NaiveTime::from_hms_opt(10, 30, 0),
            location: Some("Family clinic".to_string()),
            description: None,
            has_reminder: true,
            reminder_minutes: Some(60),
        },
        CalendarEventDraft {
            title: "Try a new vegetable".to_string(),
            event_type: EventType::Feeding,
            date: today + Duration::days(3),
            time: None,
            location: None,
            description: Some("Carrot or sweet potato puree".to_string()),
            has_reminder: false,
            reminder_minutes: None,
        },
    ];
    let mut created = 0;
    for draft in events {
        children
            .add_event(parent.id, child.id, draft)
            .map_err(AppError::command)?;
        created += 1;
    }
    Ok(Some(created))
}
