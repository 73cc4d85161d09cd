use minijinja::Environment;
use tracing::error;

pub fn init_templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();

    // Landing page is compiled into the binary
    env.add_template("index.html", include_str!("../../templates/index.html"))?;

    Ok(env)
}

pub fn render_template(env: &Environment, template_name: &str, context: minijinja::Value) -> String {
    match env.get_template(template_name) {
        Ok(tmpl) => match tmpl.render(context) {
            Ok(result) => result,
            Err(e) => {
                error!("Template render error: {}", e);
                format!("<h1>Template Error</h1><p>{}</p>", e)
            }
        },
        Err(e) => {
            error!("Template not found: {} ({})", template_name, e);
            format!("<h1>Template Not Found</h1><p>{}: {}</p>", template_name, e)
        }
    }
}
