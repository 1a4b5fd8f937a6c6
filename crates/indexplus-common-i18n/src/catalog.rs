// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message catalog lookups.
//!
//! Every key carries an English and a Spanish rendering. Unknown keys fall
//! back to the key itself so a missing entry is visible in the UI instead of
//! crashing the request.

/// Translate `key` into the given locale.
pub fn t(locale: &str, key: &str) -> String {
	catalog(locale, key)
		.map(str::to_string)
		.unwrap_or_else(|| key.to_string())
}

/// Translate `key` and substitute `{name}` placeholders from `args`.
pub fn t_fmt(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
	let mut message = t(locale, key);
	for (name, value) in args {
		message = message.replace(&format!("{{{name}}}"), value);
	}
	message
}

fn catalog(locale: &str, key: &str) -> Option<&'static str> {
	let (en, es) = match key {
		"server.api.authentication_required" => (
			"Authentication required. Please sign in.",
			"Autenticación requerida. Inicia sesión.",
		),
		"server.api.authentication_failed" => (
			"Your session is invalid or has expired.",
			"Tu sesión es inválida o ha expirado.",
		),
		"server.api.forbidden" => (
			"You do not have permission to perform this action.",
			"No tienes permisos para realizar esta acción.",
		),
		"server.api.identity_unavailable" => (
			"The identity service is not available. Try again later.",
			"El servicio de identidad no está disponible. Inténtalo más tarde.",
		),
		"server.api.login_failed" => (
			"Incorrect email or password.",
			"Correo o contraseña incorrectos.",
		),
		"server.api.member_not_found" => (
			"Team member not found.",
			"Miembro del equipo no encontrado.",
		),
		"server.api.company_not_found" => ("Company not found.", "Empresa no encontrada."),
		"server.api.customer_not_found" => ("Customer not found.", "Cliente no encontrado."),
		"server.api.sale_not_found" => ("Sale not found.", "Venta no encontrada."),
		"server.api.conversation_not_found" => (
			"Conversation not found.",
			"Conversación no encontrada.",
		),
		"server.api.conversation_closed" => (
			"This conversation is closed.",
			"Esta conversación está cerrada.",
		),
		"server.api.template_not_found" => (
			"Flow template not found.",
			"Plantilla de flujo no encontrada.",
		),
		"server.api.channel_not_found" => ("Channel not found.", "Canal no encontrado."),
		"server.api.email_taken" => (
			"That email address is already registered.",
			"Ese correo electrónico ya está registrado.",
		),
		"server.api.invalid_email" => (
			"Enter a valid email address.",
			"Ingresa un correo electrónico válido.",
		),
		"server.api.invalid_password" => (
			"The password must be at least {min} characters long.",
			"La contraseña debe tener al menos {min} caracteres.",
		),
		"server.api.invalid_full_name" => (
			"Enter the member's full name.",
			"Ingresa el nombre completo del miembro.",
		),
		"server.api.invalid_company_name" => (
			"Enter a company name.",
			"Ingresa el nombre de la empresa.",
		),
		"server.api.invalid_name" => ("Enter a name.", "Ingresa un nombre."),
		"server.api.invalid_description" => (
			"Enter a description.",
			"Ingresa una descripción.",
		),
		"server.api.invalid_reference" => (
			"Enter a payment reference.",
			"Ingresa una referencia de pago.",
		),
		"server.api.invalid_role" => ("Unknown role.", "Rol desconocido."),
		"server.api.invalid_status" => ("Unknown status.", "Estado desconocido."),
		"server.api.invalid_id" => ("Malformed identifier.", "Identificador mal formado."),
		"server.api.invalid_amount" => (
			"The amount must be greater than zero.",
			"El monto debe ser mayor que cero.",
		),
		"server.api.invalid_channel_kind" => ("Unknown channel type.", "Tipo de canal desconocido."),
		"server.api.invalid_locale" => (
			"That display language is not supported.",
			"Ese idioma no está disponible.",
		),
		"server.api.invalid_timezone" => (
			"Enter a valid timezone.",
			"Ingresa una zona horaria válida.",
		),
		"server.api.message_empty" => (
			"The message cannot be empty.",
			"El mensaje no puede estar vacío.",
		),
		"server.api.empty_update" => ("Nothing to update.", "Nada que actualizar."),
		"server.api.cannot_delete_self" => (
			"You cannot remove your own account.",
			"No puedes eliminar tu propia cuenta.",
		),
		"server.api.provisioning_timeout" => (
			"The new member was created but is not visible yet. Refresh in a moment.",
			"El nuevo miembro fue creado pero aún no es visible. Actualiza en un momento.",
		),
		"server.api.storage_error" => (
			"A storage error occurred. Try again later.",
			"Ocurrió un error de almacenamiento. Inténtalo más tarde.",
		),
		"server.api.internal_error" => (
			"Something went wrong. Try again later.",
			"Algo salió mal. Inténtalo más tarde.",
		),
		"server.api.logged_out" => ("You have been signed out.", "Has cerrado sesión."),
		"server.api.member_deleted" => (
			"The team member was removed.",
			"El miembro del equipo fue eliminado.",
		),
		"server.api.password_updated" => (
			"The password was updated.",
			"La contraseña fue actualizada.",
		),
		"server.api.customer_deleted" => ("The customer was deleted.", "El cliente fue eliminado."),
		"server.api.sale_deleted" => ("The sale was deleted.", "La venta fue eliminada."),
		"server.api.template_deleted" => (
			"The flow template was deleted.",
			"La plantilla de flujo fue eliminada.",
		),
		"server.api.channel_removed" => ("The channel was removed.", "El canal fue eliminado."),
		"server.relay.title" => ("Connecting channel", "Conectando canal"),
		"server.relay.close_hint" => (
			"You can close this window.",
			"Puedes cerrar esta ventana.",
		),
		_ => return None,
	};

	Some(match locale {
		"es" => es,
		_ => en,
	})
}
