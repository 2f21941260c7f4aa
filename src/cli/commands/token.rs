use crate::auth::{generate_token, Claims, Role};

pub fn handle(subject: String, role: String) -> anyhow::Result<()> {
    let role: Role = role
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let token = generate_token(&Claims::new(subject, role))?;
    println!("{}", token);
    Ok(())
}
