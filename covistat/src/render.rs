// covistat/src/render.rs

// Les pages sont embarquées dans le binaire : pas de dossier de templates
// à déployer à côté de l'exécutable.

use minijinja::Environment;

pub fn build_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();

    env.add_template("index.html", include_str!("../templates/index.html"))?;
    env.add_template("upload.html", include_str!("../templates/upload.html"))?;

    Ok(env)
}
