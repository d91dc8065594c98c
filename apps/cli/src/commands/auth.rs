use farmstand_client::AppContext;

pub async fn login(ctx: &AppContext, phone: &str, password: &str) -> anyhow::Result<()> {
    let pending = ctx.login_password(phone, password).await?;
    match pending.destination {
        Some(dest) => println!("Code sent to {dest}"),
        None => println!("Code sent"),
    }
    println!(
        "Run: farmstand verify --session {} --code <code>",
        pending.pending_session_id
    );
    Ok(())
}

pub async fn verify(ctx: &AppContext, session: &str, code: &str) -> anyhow::Result<()> {
    let user = ctx.verify_two_factor(session, code).await?;
    println!("Signed in as {} ({})", user.name, user.role);
    Ok(())
}

pub async fn logout(ctx: &AppContext) {
    ctx.logout().await;
    println!("Signed out");
}

pub async fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    if !ctx.session.is_authenticated().await {
        println!("Not signed in");
        return Ok(());
    }

    let user = ctx.refresh_profile().await?;
    println!("{} <{}>", user.name, user.phone);
    println!("  id:   {}", user.id);
    println!("  role: {}", user.role);
    if let Some(profile) = &user.farmer_profile {
        println!("  farm: {} (rating {:.1})", profile.business_name, profile.rating);
    }
    Ok(())
}
